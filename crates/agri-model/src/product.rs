//! Reference database of genuine agri-input products.
//!
//! Field scans look products up here to learn their counterfeit markers and
//! retail price.

use std::fmt;

/// Product family.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProductCategory {
    Pesticides,
    Fertilizers,
    Seeds,
}

impl ProductCategory {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pesticides => "pesticides",
            Self::Fertilizers => "fertilizers",
            Self::Seeds => "seeds",
        }
    }

    /// Sample type recorded when a product of this family is sent to a lab.
    pub const fn sample_type(&self) -> &'static str {
        match self {
            Self::Pesticides => "Pesticide",
            Self::Fertilizers => "Fertilizer",
            Self::Seeds => "Seed",
        }
    }
}

impl fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maximum retail price, flat or per pack size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mrp {
    Flat(u32),
    ByPack(&'static [(&'static str, u32)]),
}

impl Mrp {
    /// Flat price, or the price of the first listed pack.
    pub fn reference_price(&self) -> Option<u32> {
        match self {
            Self::Flat(price) => Some(*price),
            Self::ByPack(packs) => packs.first().map(|(_, price)| *price),
        }
    }

    pub fn for_pack(&self, pack: &str) -> Option<u32> {
        match self {
            Self::Flat(price) => Some(*price),
            Self::ByPack(packs) => packs
                .iter()
                .find(|(size, _)| *size == pack)
                .map(|(_, price)| *price),
        }
    }
}

/// One genuine product as registered by its manufacturer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProductRecord {
    pub category: ProductCategory,
    pub brand: &'static str,
    pub name: &'static str,
    pub active_ingredient: Option<&'static str>,
    pub composition: Option<&'static str>,
    pub varieties: &'static [&'static str],
    pub packaging: &'static [&'static str],
    pub batch_format: Option<&'static str>,
    pub counterfeit_markers: &'static [&'static str],
    pub hologram_features: &'static [&'static str],
    pub bag_color: Option<&'static str>,
    pub subsidized_rate: Option<u32>,
    pub mrp: Mrp,
}

const EMPTY: &[&str] = &[];

/// Every registered product.
pub static PRODUCT_DATABASE: &[ProductRecord] = &[
    ProductRecord {
        category: ProductCategory::Pesticides,
        brand: "UPL",
        name: "Saaf",
        active_ingredient: Some("Carbendazim 12% + Mancozeb 63%"),
        composition: None,
        varieties: EMPTY,
        packaging: &["100g", "250g", "500g"],
        batch_format: Some("UPL-SAAF-YYYYMM-XXXXX"),
        counterfeit_markers: &[
            "Poor print quality",
            "Wrong shade of green",
            "Missing hologram",
        ],
        hologram_features: EMPTY,
        bag_color: None,
        subsidized_rate: None,
        mrp: Mrp::ByPack(&[("100g", 120), ("250g", 280), ("500g", 520)]),
    },
    ProductRecord {
        category: ProductCategory::Pesticides,
        brand: "UPL",
        name: "Ulala",
        active_ingredient: Some("Flonicamid 50% WG"),
        composition: None,
        varieties: EMPTY,
        packaging: &["100g", "500g"],
        batch_format: Some("UPL-ULA-YYYYMM-XXXXX"),
        counterfeit_markers: EMPTY,
        hologram_features: EMPTY,
        bag_color: None,
        subsidized_rate: None,
        mrp: Mrp::ByPack(&[("100g", 650), ("500g", 3100)]),
    },
    ProductRecord {
        category: ProductCategory::Pesticides,
        brand: "Bayer",
        name: "Confidor",
        active_ingredient: Some("Imidacloprid 17.8% SL"),
        composition: None,
        varieties: EMPTY,
        packaging: &["50ml", "100ml", "250ml", "500ml"],
        batch_format: None,
        counterfeit_markers: EMPTY,
        hologram_features: &["3D hologram", "Color-changing ink", "Microtext"],
        bag_color: None,
        subsidized_rate: None,
        mrp: Mrp::ByPack(&[("50ml", 165), ("100ml", 320), ("250ml", 785), ("500ml", 1550)]),
    },
    ProductRecord {
        category: ProductCategory::Fertilizers,
        brand: "IFFCO",
        name: "DAP",
        active_ingredient: None,
        composition: Some("18-46-0"),
        varieties: EMPTY,
        packaging: &["50kg"],
        batch_format: None,
        counterfeit_markers: EMPTY,
        hologram_features: EMPTY,
        bag_color: Some("Green with IFFCO logo"),
        subsidized_rate: Some(1350),
        mrp: Mrp::Flat(1350),
    },
    ProductRecord {
        category: ProductCategory::Seeds,
        brand: "Mahyco",
        name: "Bt Cotton",
        active_ingredient: None,
        composition: None,
        varieties: &["MECH-162", "MECH-184"],
        packaging: &["450g"],
        batch_format: None,
        counterfeit_markers: EMPTY,
        hologram_features: EMPTY,
        bag_color: None,
        subsidized_rate: None,
        mrp: Mrp::ByPack(&[("450g", 930)]),
    },
];

/// Case-insensitive lookup by brand and product name.
pub fn find_product(brand: &str, name: &str) -> Option<&'static ProductRecord> {
    PRODUCT_DATABASE.iter().find(|record| {
        record.brand.eq_ignore_ascii_case(brand.trim())
            && record.name.eq_ignore_ascii_case(name.trim())
    })
}

/// Distinct brands registered in a category, in database order.
pub fn brands(category: ProductCategory) -> Vec<&'static str> {
    let mut out: Vec<&'static str> = Vec::new();
    for record in PRODUCT_DATABASE.iter().filter(|r| r.category == category) {
        if !out.contains(&record.brand) {
            out.push(record.brand);
        }
    }
    out
}
