//! Shopping Cart Business Logic Helpers
//!
//! This module contains helper functions for cart operations and formatting.

use super::models::{CartLine, Location, ShippingAddress, ShippingAddressPatch};
use crate::{catalog::models::Product, error::AppError};

/// Inserts `line`, replacing any existing line for the same product in place.
///
/// Unlike a merge, the incoming quantity is taken as-is: callers compute the
/// desired total before dispatching.
pub fn upsert_line(cart_items: &[CartLine], line: CartLine) -> Vec<CartLine> {
    let mut items = cart_items.to_vec();
    match items.iter_mut().find(|i| i.id == line.id) {
        Some(existing) => *existing = line,
        None => items.push(line),
    }
    items
}

/// Overwrites the fields present in `patch`.
pub fn merge_shipping_address(
    current: &ShippingAddress,
    patch: &ShippingAddressPatch,
) -> ShippingAddress {
    let pick = |new: &Option<String>, old: &String| new.clone().unwrap_or_else(|| old.clone());

    ShippingAddress {
        full_name: pick(&patch.full_name, &current.full_name),
        address: pick(&patch.address, &current.address),
        city: pick(&patch.city, &current.city),
        state: pick(&patch.state, &current.state),
        postal_code: pick(&patch.postal_code, &current.postal_code),
        country: pick(&patch.country, &current.country),
        location: patch.location.clone().or_else(|| current.location.clone()),
    }
}

/// Derives structured address fields from a geocoded location.
///
/// The free-text address is assumed to look like
/// `"street, city, ST postal, country"`. The third segment is split on single
/// spaces and read at positions 1 and 2, so it must keep its leading space.
/// Addresses in any other shape produce partial or misplaced fields; missing
/// segments become empty strings. `full_name` is kept from `current`.
pub fn parse_map_location(current: &ShippingAddress, location: &Location) -> ShippingAddress {
    let segments: Vec<&str> = location.address.split(',').collect();
    let segment = |i: usize| segments.get(i).copied().unwrap_or_default().to_string();

    let region: Vec<&str> = segments
        .get(2)
        .map(|s| s.split(' ').collect())
        .unwrap_or_default();
    let region_part = |i: usize| region.get(i).copied().unwrap_or_default().to_string();

    ShippingAddress {
        full_name: current.full_name.clone(),
        address: segment(0),
        city: segment(1),
        state: region_part(1),
        postal_code: region_part(2),
        country: segment(3),
        location: Some(location.clone()),
    }
}

/// Stock precondition for adding `quantity` units of `product` to a cart.
pub fn ensure_in_stock(product: &Product, quantity: u32) -> Result<(), AppError> {
    if quantity == 0 {
        return Err(AppError::BadRequest("Quantity must be at least 1".into()));
    }
    if product.count_in_stock == 0 {
        return Err(AppError::Conflict(
            "Sorry, the Product is out of Stock.".into(),
        ));
    }
    if product.count_in_stock < quantity {
        return Err(AppError::Conflict(
            "Sorry, there are not enough of this Product in Stock.".into(),
        ));
    }
    Ok(())
}

/// Produces a human-readable one-line summary for a list of cart lines.
///
/// Example output: `"2x Fit Shirt, 1x Golf Pants"`.
pub fn format_item_summary(items: &[CartLine]) -> String {
    items
        .iter()
        .map(|i| format!("{}x {}", i.quantity, i.name))
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::models::ProductFields;
    use std::collections::HashMap;

    fn line(id: &str, quantity: u32) -> CartLine {
        CartLine {
            id: id.into(),
            name: format!("Product {id}"),
            slug: id.into(),
            image: String::new(),
            price: 10.0,
            count_in_stock: 20,
            quantity,
        }
    }

    fn location(address: &str) -> Location {
        Location {
            lat: 39.78,
            lng: -89.65,
            address: address.into(),
            extra: HashMap::new(),
        }
    }

    #[test]
    fn test_upsert_replaces_in_place() {
        let items = vec![line("a", 1), line("b", 1)];
        let items = upsert_line(&items, line("a", 4));

        assert_eq!(items.len(), 2);
        assert_eq!(items[0].id, "a");
        assert_eq!(items[0].quantity, 4);
    }

    #[test]
    fn test_parse_map_location_standard_shape() {
        let current = ShippingAddress {
            full_name: "Jane Doe".into(),
            ..Default::default()
        };
        let parsed = parse_map_location(
            &current,
            &location("123 Main St, Springfield, IL 62704, USA"),
        );

        assert_eq!(parsed.full_name, "Jane Doe");
        assert_eq!(parsed.address, "123 Main St");
        assert_eq!(parsed.city, " Springfield");
        assert_eq!(parsed.state, "IL");
        assert_eq!(parsed.postal_code, "62704");
        assert_eq!(parsed.country, " USA");
        assert_eq!(parsed.location.unwrap().lat, 39.78);
    }

    #[test]
    fn test_parse_map_location_short_address_does_not_panic() {
        let parsed = parse_map_location(&ShippingAddress::default(), &location("Somewhere"));

        assert_eq!(parsed.address, "Somewhere");
        assert_eq!(parsed.city, "");
        assert_eq!(parsed.state, "");
        assert_eq!(parsed.postal_code, "");
        assert_eq!(parsed.country, "");
    }

    #[test]
    fn test_merge_keeps_absent_fields() {
        let current = ShippingAddress {
            full_name: "Jane".into(),
            city: "Paris".into(),
            ..Default::default()
        };
        let merged = merge_shipping_address(
            &current,
            &ShippingAddressPatch {
                city: Some("Lyon".into()),
                ..Default::default()
            },
        );

        assert_eq!(merged.full_name, "Jane");
        assert_eq!(merged.city, "Lyon");
    }

    #[test]
    fn test_stock_precondition() {
        let mut product = Product::new(ProductFields {
            name: "Fit Shirt".into(),
            slug: "fit-shirt".into(),
            category: "Shirts".into(),
            image: String::new(),
            price: 98.0,
            brand: "Ralph Lauren".into(),
            count_in_stock: 2,
            description: String::new(),
            is_featured: false,
        });

        assert!(ensure_in_stock(&product, 2).is_ok());
        assert!(matches!(
            ensure_in_stock(&product, 3),
            Err(AppError::Conflict(_))
        ));
        assert!(matches!(
            ensure_in_stock(&product, 0),
            Err(AppError::BadRequest(_))
        ));

        product.count_in_stock = 0;
        assert!(matches!(
            ensure_in_stock(&product, 1),
            Err(AppError::Conflict(_))
        ));
    }

    #[test]
    fn test_format_item_summary() {
        assert_eq!(
            format_item_summary(&[line("a", 2), line("b", 1)]),
            "2x Product a, 1x Product b"
        );
    }
}
