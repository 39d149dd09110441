//! Built-in starter catalog, used when no cached catalog exists.

use crate::types::{Category, Price, ProductId};

use super::product::Product;

struct Seed {
    id: &'static str,
    name: &'static str,
    cents: i64,
    description: &'static str,
    image_seed: &'static str,
    category: Category,
    rating_tenths: u32,
    stock: u32,
}

const SEEDS: [Seed; 5] = [
    Seed {
        id: "1",
        name: "ThunderCharge 65W GaN",
        cents: 4999,
        description: "Ultra-compact high-speed charger for laptops and phones.",
        image_seed: "charger",
        category: Category::Power,
        rating_tenths: 48,
        stock: 120,
    },
    Seed {
        id: "2",
        name: "SonicWave Elite TWS",
        cents: 12900,
        description: "Noise-cancelling wireless earbuds with 40h battery life.",
        image_seed: "earbuds",
        category: Category::Audio,
        rating_tenths: 49,
        stock: 85,
    },
    Seed {
        id: "3",
        name: "HyperConnect HDMI 2.1",
        cents: 2499,
        description: "8K Ultra HD compatible HDMI cable with braided shield.",
        image_seed: "cable",
        category: Category::Connectivity,
        rating_tenths: 45,
        stock: 200,
    },
    Seed {
        id: "4",
        name: "ShieldPro Laptop Sleeve",
        cents: 3500,
        description: "Water-resistant protective sleeve for 14-inch laptops.",
        image_seed: "sleeve",
        category: Category::Protection,
        rating_tenths: 47,
        stock: 50,
    },
    Seed {
        id: "5",
        name: "PrecisionClick MX",
        cents: 8999,
        description: "Ergonomic wireless mouse with precision tracking.",
        image_seed: "mouse",
        category: Category::Input,
        rating_tenths: 49,
        stock: 30,
    },
];

/// The starter catalog. Each product's rating count is produced by
/// `rating_count`, so callers choose whether it is random or fixed.
pub fn initial_products(mut rating_count: impl FnMut() -> u32) -> Vec<Product> {
    SEEDS
        .iter()
        .map(|seed| Product {
            id: ProductId::new(seed.id),
            name: seed.name.to_owned(),
            price: Price::from_cents(seed.cents),
            description: seed.description.to_owned(),
            image: format!("https://picsum.photos/seed/{}/400/400", seed.image_seed),
            category: seed.category,
            rating: f64::from(seed.rating_tenths) / 10.0,
            rating_count: rating_count(),
            stock: seed.stock,
            reviews: Vec::new(),
        })
        .collect()
}
