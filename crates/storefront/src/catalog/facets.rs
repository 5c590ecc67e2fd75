//! Facet counts over the currently held product list.

use std::collections::BTreeMap;

use crate::api::types::Product;

/// A facet value and how many held products carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FacetCount {
    pub value: String,
    pub count: usize,
}

/// Facet counts for the listing sidebar.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub categories: Vec<FacetCount>,
    pub sub_categories: Vec<FacetCount>,
    pub brands: Vec<FacetCount>,
}

/// Count products per category, sub-category and brand.
///
/// Values are sorted by name. Empty values are not counted.
#[must_use]
pub fn facets(products: &[Product]) -> Facets {
    Facets {
        categories: count_by(products, |p| &p.category),
        sub_categories: count_by(products, |p| &p.sub_category),
        brands: count_by(products, |p| &p.brand),
    }
}

fn count_by(products: &[Product], key: impl Fn(&Product) -> &String) -> Vec<FacetCount> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for product in products {
        let value = key(product).as_str();
        if !value.is_empty() {
            *counts.entry(value).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .map(|(value, count)| FacetCount {
            value: value.to_string(),
            count,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(category: &str, brand: &str) -> Product {
        Product {
            category: category.to_string(),
            brand: brand.to_string(),
            ..Product::default()
        }
    }

    #[test]
    fn test_counts_sorted_by_name() {
        let products = vec![
            product("vapes", "Geek Bar"),
            product("cigars", "Padron"),
            product("cigars", "Arturo Fuente"),
            product("cigars", "Padron"),
        ];

        let facets = facets(&products);

        assert_eq!(
            facets.categories,
            vec![
                FacetCount {
                    value: "cigars".to_string(),
                    count: 3
                },
                FacetCount {
                    value: "vapes".to_string(),
                    count: 1
                },
            ]
        );
        assert_eq!(facets.brands.len(), 3);
        assert_eq!(facets.brands[0].value, "Arturo Fuente");
        assert_eq!(facets.brands[2].count, 2);
    }

    #[test]
    fn test_empty_values_skipped() {
        let products = vec![product("", ""), product("hookah", "")];
        let facets = facets(&products);

        assert_eq!(facets.categories.len(), 1);
        assert!(facets.brands.is_empty());
        assert!(facets.sub_categories.is_empty());
    }
}
