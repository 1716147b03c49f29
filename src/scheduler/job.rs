use std::str::FromStr;

use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::DispatchError;

/// Device model line a job belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Category {
    Jaguar,
    Leopard,
    Lion,
}

impl Category {
    pub const ALL: [Category; 3] = [Category::Jaguar, Category::Leopard, Category::Lion];

    /// Draw a category uniformly from [`Category::ALL`].
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self::ALL[rng.gen_range(0..Self::ALL.len())]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Jaguar => "Jaguar",
            Category::Leopard => "Leopard",
            Category::Lion => "Lion",
        }
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Category {
    type Err = DispatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| DispatchError::UnknownCategory(s.to_string()))
    }
}

/// A queued unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub id: Uuid,
    subject: String,
    category: Category,
}

impl Job {
    pub fn new(subject: impl Into<String>, category: Category) -> Self {
        Self {
            id: Uuid::new_v4(),
            subject: subject.into(),
            category,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn category(&self) -> Category {
        self.category
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_category(&mut self, category: Category) {
        self.category = category;
    }
}

/// Synthesize `count` jobs named `Customer 1..=count` with random categories.
pub fn demo_jobs<R: Rng + ?Sized>(count: usize, rng: &mut R) -> Vec<Job> {
    (1..=count)
        .map(|i| Job::new(format!("Customer {}", i), Category::random(rng)))
        .collect()
}
