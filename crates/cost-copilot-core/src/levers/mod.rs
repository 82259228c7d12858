pub mod playbook;
pub mod tie_break;

pub use playbook::{
    evaluate_play, playbook_components, playbook_for, Play, PlayEvaluation, PlayEvaluationInput,
    Playbook,
};
pub use tie_break::{highest_feasibility_drivers, select_lever, FeasibilityTie};
