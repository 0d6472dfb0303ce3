//! Sample data loaded at startup when `SEED_CATALOG` is enabled.

use tracing::info;

use crate::{
    catalog::models::{Product, ProductFields},
    error::AppError,
    state::AppState,
    users::{models::User, password::hash_password},
};

/// name, category, image, price, brand, rating, review count, description
type SampleProduct = (&'static str, &'static str, &'static str, f64, &'static str, f64, u32, &'static str);

const SAMPLE_PRODUCTS: [SampleProduct; 6] = [
    ("Free Shirt", "Shirts", "/images/shirt1.jpg", 50.0, "Nike", 3.4, 10, "A popular shirt"),
    ("Fit Shirt", "Shirts", "/images/shirt2.jpg", 98.0, "Ralph Lauren", 4.2, 10, "A popular shirt"),
    ("Slim Shirt", "Shirts", "/images/shirt3.jpg", 75.0, "Calvin Klein", 4.5, 10, "A popular shirt"),
    ("Golf Pants", "Pants", "/images/pants1.jpg", 82.0, "Hugo Boss", 4.7, 10, "Smart looking pants"),
    ("Fit Pants", "Pants", "/images/pants2.jpg", 54.0, "Adidas", 4.0, 10, "A popular pants"),
    ("Classic Pants", "Pants", "/images/pants3.jpg", 70.0, "Lacoste", 3.8, 10, "A popular pants"),
];

const SAMPLE_STOCK: u32 = 20;

/// (name, email, password, is_admin)
const SAMPLE_USERS: [(&str, &str, &str, bool); 2] = [
    ("John", "admin@example.com", "123456", true),
    ("Jane", "user@example.com", "123456", false),
];

fn slugify(name: &str) -> String {
    name.to_lowercase().split_whitespace().collect::<Vec<_>>().join("-")
}

/// The sample catalog, in the order it is inserted.
pub fn sample_products() -> Vec<Product> {
    SAMPLE_PRODUCTS
        .iter()
        .enumerate()
        .map(
            |(i, &(name, category, image, price, brand, rating, num_reviews, description))| {
                let mut product = Product::new(ProductFields {
                    name: name.into(),
                    slug: slugify(name),
                    category: category.into(),
                    image: image.into(),
                    price,
                    brand: brand.into(),
                    count_in_stock: SAMPLE_STOCK,
                    description: description.into(),
                    is_featured: i < 2,
                });
                product.rating = rating;
                product.num_reviews = num_reviews;
                product
            },
        )
        .collect()
}

/// Inserts the sample catalog and accounts into empty collections.
/// Collections that already hold data are left untouched.
pub async fn seed(state: &AppState) -> Result<(), AppError> {
    if state.products.count_all().await? == 0 {
        for product in sample_products() {
            state.products.insert(product).await?;
        }
        info!("Seeded {} sample products", SAMPLE_PRODUCTS.len());
    }

    if state.users.count() == 0 {
        for (name, email, password, is_admin) in SAMPLE_USERS {
            let hash = hash_password(password).await?;
            let user = User::new(name.into(), email.into(), hash, is_admin);
            state.users.insert(user)?;
        }
        info!("Seeded {} sample users", SAMPLE_USERS.len());
    }

    Ok(())
}
