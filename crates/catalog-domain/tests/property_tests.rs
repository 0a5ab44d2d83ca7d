//! Property-based tests for catalog domain types

use catalog_domain::{Product, ProductId};
use proptest::prelude::*;

fn product_with_categories(categories: Vec<String>) -> Product {
    Product::new("name", categories, "description", "image.png", 1.0)
}

proptest! {
    #[test]
    fn prop_category_matches_itself_in_any_case(category in "[a-zA-Z ]{1,24}") {
        let product = product_with_categories(vec![category.clone()]);

        prop_assert!(product.in_category(&category));
        prop_assert!(product.in_category(&category.to_uppercase()));
        prop_assert!(product.in_category(&category.to_lowercase()));
    }

    #[test]
    fn prop_every_substring_matches(category in "[a-z]{2,16}", start in 0usize..8, len in 1usize..8) {
        let start = start.min(category.len() - 1);
        let end = (start + len).min(category.len());
        let needle = &category[start..end];

        let product = product_with_categories(vec![category.clone()]);
        prop_assert!(product.in_category(needle));
    }

    #[test]
    fn prop_no_categories_never_match(needle in "[a-z]{1,8}") {
        let product = product_with_categories(Vec::new());
        prop_assert!(!product.in_category(&needle));
    }

    #[test]
    fn prop_id_parses_back_from_display(raw in any::<u128>()) {
        let id = ProductId::from_uuid(uuid::Uuid::from_u128(raw));
        let parsed = ProductId::from_string(&id.to_string()).unwrap();
        prop_assert_eq!(parsed, id);
    }
}
