//! In-memory country repository.
//!
//! # Responsibilities
//! - Seed the fixed dataset once at startup
//! - Answer exact-name lookups
//!
//! Matching is exact and case-sensitive: "spain" does not find "Spain".

use std::collections::HashMap;

use crate::country::model::{Country, Currency};

/// Read-only store of country records, keyed by name.
#[derive(Debug, Clone)]
pub struct CountryRepository {
    countries: HashMap<String, Country>,
}

impl CountryRepository {
    /// Build a repository from arbitrary records. Later duplicates replace earlier ones.
    pub fn from_countries(countries: impl IntoIterator<Item = Country>) -> Self {
        let countries = countries
            .into_iter()
            .map(|c| (c.name.clone(), c))
            .collect();
        Self { countries }
    }

    /// Repository seeded with the service's built-in dataset.
    pub fn seeded() -> Self {
        let repository = Self::from_countries([
            Country::new("Spain", "Madrid", Currency::EUR, 46_704_314),
            Country::new("Poland", "Warsaw", Currency::PLN, 38_186_860),
            Country::new("United Kingdom", "London", Currency::GBP, 63_705_000),
        ]);
        tracing::debug!(countries = repository.len(), "Country repository seeded");
        repository
    }

    /// Look up a country by exact name.
    pub fn find_country(&self, name: &str) -> Option<&Country> {
        self.countries.get(name)
    }

    pub fn len(&self) -> usize {
        self.countries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Country> {
        self.countries.values()
    }
}

impl Default for CountryRepository {
    fn default() -> Self {
        Self::seeded()
    }
}
