//! Venture records and the list operations the store applies to them.

use crate::core::constants::{CRYPTO_EXPENSES, CRYPTO_VENTURE_NAME, EXPENSES_PLACEHOLDER};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// A user-entered business idea.
#[derive(Debug, Clone, PartialEq)]
pub struct OrdinaryVenture {
    pub id: u64,
    pub name: String,
    pub revenue: f64,
    pub expenses: String,
}

/// The synthetic crypto position. Its revenue is profit since purchase and is
/// only ever written by the reconciler.
#[derive(Debug, Clone, PartialEq)]
pub struct CryptoVenture {
    id: u64,
    name: String,
    revenue: f64,
    expenses: String,
}

impl CryptoVenture {
    pub fn new(id: u64) -> Self {
        Self {
            id,
            name: CRYPTO_VENTURE_NAME.to_string(),
            revenue: 0.0,
            expenses: CRYPTO_EXPENSES.to_string(),
        }
    }

    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn revenue(&self) -> f64 {
        self.revenue
    }

    pub fn expenses(&self) -> &str {
        &self.expenses
    }

    pub(crate) fn with_revenue(&self, revenue: f64) -> Self {
        Self {
            revenue,
            ..self.clone()
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "VentureRecord", into = "VentureRecord")]
pub enum Venture {
    Ordinary(OrdinaryVenture),
    Crypto(CryptoVenture),
}

impl Venture {
    pub fn id(&self) -> u64 {
        match self {
            Venture::Ordinary(v) => v.id,
            Venture::Crypto(v) => v.id,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            Venture::Ordinary(v) => &v.name,
            Venture::Crypto(v) => &v.name,
        }
    }

    pub fn revenue(&self) -> f64 {
        match self {
            Venture::Ordinary(v) => v.revenue,
            Venture::Crypto(v) => v.revenue,
        }
    }

    pub fn expenses(&self) -> &str {
        match self {
            Venture::Ordinary(v) => &v.expenses,
            Venture::Crypto(v) => &v.expenses,
        }
    }

    pub fn is_crypto(&self) -> bool {
        matches!(self, Venture::Crypto(_))
    }
}

/// On-disk layout of a venture. Kept flat so older saves without the
/// discriminator still parse.
#[derive(Debug, Clone, Serialize, Deserialize)]
struct VentureRecord {
    id: u64,
    name: String,
    #[serde(default)]
    revenue: f64,
    #[serde(default)]
    expenses: String,
    #[serde(
        default,
        rename = "isCrypto",
        skip_serializing_if = "std::ops::Not::not"
    )]
    is_crypto: bool,
}

impl From<VentureRecord> for Venture {
    fn from(record: VentureRecord) -> Self {
        if record.is_crypto {
            Venture::Crypto(CryptoVenture {
                id: record.id,
                name: record.name,
                revenue: record.revenue,
                expenses: record.expenses,
            })
        } else {
            Venture::Ordinary(OrdinaryVenture {
                id: record.id,
                name: record.name,
                revenue: record.revenue,
                expenses: record.expenses,
            })
        }
    }
}

impl From<Venture> for VentureRecord {
    fn from(venture: Venture) -> Self {
        match venture {
            Venture::Ordinary(v) => VentureRecord {
                id: v.id,
                name: v.name,
                revenue: v.revenue,
                expenses: v.expenses,
                is_crypto: false,
            },
            Venture::Crypto(v) => VentureRecord {
                id: v.id,
                name: v.name,
                revenue: v.revenue,
                expenses: v.expenses,
                is_crypto: true,
            },
        }
    }
}

/// The list shown before the user has saved anything.
pub fn seed_ventures() -> Vec<Venture> {
    let ordinary = [
        (1, "Artisanal ice cube delivery", "$2,400 in freezer bags"),
        (2, "Blockchain for sourdough starters", "$800 domain + hosting"),
        (3, "Uber for dog walkers' dogs", "Two summers"),
        (4, "NFT collection of parking tickets", "$350 in gas fees"),
    ];

    let mut ventures: Vec<Venture> = ordinary
        .into_iter()
        .map(|(id, name, expenses)| {
            Venture::Ordinary(OrdinaryVenture {
                id,
                name: name.to_string(),
                revenue: 0.0,
                expenses: expenses.to_string(),
            })
        })
        .collect();
    ventures.push(Venture::Crypto(CryptoVenture::new(5)));
    ventures
}

/// Makes sure exactly one crypto venture exists. Extra crypto records are
/// dropped, a missing one is appended.
pub fn ensure_crypto_venture(ventures: Vec<Venture>) -> Vec<Venture> {
    let mut seen_crypto = false;
    let mut result: Vec<Venture> = Vec::with_capacity(ventures.len() + 1);
    for venture in ventures {
        if venture.is_crypto() {
            if seen_crypto {
                tracing::warn!(id = venture.id(), "Dropping duplicate crypto venture");
                continue;
            }
            seen_crypto = true;
        }
        result.push(venture);
    }

    if !seen_crypto {
        let id = next_id(&result, 0);
        tracing::debug!(id, "Migrating saved ventures: appending crypto venture");
        result.push(Venture::Crypto(CryptoVenture::new(id)));
    }
    result
}

/// Returns a fresh id: `candidate` when unused, otherwise one past the
/// largest id in the list. When the largest id is `u64::MAX` the smallest
/// unused id is taken instead.
pub fn next_id(ventures: &[Venture], candidate: u64) -> u64 {
    let max = ventures.iter().map(Venture::id).max();
    match max {
        None => candidate.max(1),
        Some(max) if candidate > max => candidate,
        Some(max) => max
            .checked_add(1)
            .unwrap_or_else(|| smallest_unused_id(ventures)),
    }
}

fn smallest_unused_id(ventures: &[Venture]) -> u64 {
    let used: HashSet<u64> = ventures.iter().map(Venture::id).collect();
    (1..=u64::MAX).find(|id| !used.contains(id)).unwrap_or(0)
}

/// Appends a new ordinary venture. A blank name leaves the list untouched and
/// a non-numeric revenue becomes zero.
pub fn add_venture(
    ventures: &[Venture],
    name: &str,
    revenue: &str,
    expenses: &str,
    candidate_id: u64,
) -> Vec<Venture> {
    let name = name.trim();
    if name.is_empty() {
        return ventures.to_vec();
    }

    let revenue = revenue
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|r| r.is_finite())
        .unwrap_or(0.0);
    let expenses = match expenses.trim() {
        "" => EXPENSES_PLACEHOLDER.to_string(),
        e => e.to_string(),
    };

    let mut updated = ventures.to_vec();
    updated.push(Venture::Ordinary(OrdinaryVenture {
        id: next_id(ventures, candidate_id),
        name: name.to_string(),
        revenue,
        expenses,
    }));
    updated
}

/// Removes the ordinary venture with `id`. The crypto venture never matches.
pub fn delete_venture(ventures: &[Venture], id: u64) -> Vec<Venture> {
    ventures
        .iter()
        .filter(|v| match v {
            Venture::Ordinary(o) => o.id != id,
            Venture::Crypto(_) => true,
        })
        .cloned()
        .collect()
}
