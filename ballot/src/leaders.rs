//! The candidates up for vote.

use serde::{Deserialize, Serialize};

/// All seed entries share one portrait; nobody has contributed real ones yet.
const PLACEHOLDER_IMAGE: &str =
    "https://images.unsplash.com/photo-1621416894569-0f39ed31d247?auto=format&fit=crop&q=80&w=1374";

/// A votable leader.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Leader {
    pub id: u32,
    pub name: String,
    pub country: String,
    /// ISO 3166-1 alpha-2, lowercase, for flag lookups.
    pub country_code: String,
    pub image_url: String,
    pub votes: u64,
}

impl Leader {
    fn seeded(id: u32, name: &str, country: &str, country_code: &str, votes: u64) -> Self {
        Self {
            id,
            name: name.to_string(),
            country: country.to_string(),
            country_code: country_code.to_string(),
            image_url: PLACEHOLDER_IMAGE.to_string(),
            votes,
        }
    }

    /// The built-in nine-leader roster, in id order.
    pub fn seed() -> Vec<Leader> {
        vec![
            Self::seeded(1, "Satoshi Nakamoto", "Japan", "jp", 214),
            Self::seeded(2, "Vitalik Buterin", "Russia", "ru", 189),
            Self::seeded(3, "Charles Hoskinson", "United States", "us", 143),
            Self::seeded(4, "Gavin Wood", "United Kingdom", "gb", 128),
            Self::seeded(5, "Silvio Micali", "Italy", "it", 117),
            Self::seeded(6, "Arthur Breitman", "France", "fr", 92),
            Self::seeded(7, "Jae Kwon", "South Korea", "kr", 87),
            Self::seeded(8, "Joseph Lubin", "Canada", "ca", 74),
            Self::seeded(9, "Da Hongfei", "China", "cn", 69),
        ]
    }
}
