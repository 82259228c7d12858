use std::collections::HashSet;

use crate::types::{BomLineItem, Product};

/// Distinct products in BOM order; the first line of each product supplies
/// its metadata.
pub fn unique_products(bom: &[BomLineItem]) -> Vec<Product> {
    let mut seen: HashSet<&str> = HashSet::new();
    bom.iter()
        .filter(|line| seen.insert(line.product_id.as_str()))
        .map(Product::from)
        .collect()
}
