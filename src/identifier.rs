//! Identifier generation
//!
//! Account number allocation and IBAN derivation. The generator holds a
//! per-instance RNG so concurrent commands never contend on shared state
//! and tests can seed it deterministically. Allocation is collision-checked
//! against the repository inside the caller's transaction; the UNIQUE
//! constraint on `accounts.account_number` is the commit-time backstop.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::domain::DomainError;
use crate::error::AppError;
use crate::repository::AccountRepository;
use crate::uow::UnitOfWork;

/// Inclusive bounds of the 7-digit account number range
pub const ACCOUNT_NUMBER_MIN: i64 = 1_000_000;
pub const ACCOUNT_NUMBER_MAX: i64 = 9_999_999;

/// Fixed bank constants baked into every IBAN
const IBAN_COUNTRY_PREFIX: &str = "TR";
const IBAN_BRANCH_BLOCK: &str = "97925786";
const IBAN_SUFFIX: &str = "01";

/// Derive the IBAN string for an account number.
/// Pure and deterministic; the IBAN is always re-derivable from the number.
pub fn derive_iban(account_number: i64) -> String {
    format!("{IBAN_COUNTRY_PREFIX}{account_number}{IBAN_BRANCH_BLOCK}{account_number}{IBAN_SUFFIX}")
}

/// Account number generator with a per-instance RNG
#[derive(Debug)]
pub struct AccountNumberGenerator {
    rng: StdRng,
    max_attempts: u32,
}

const DEFAULT_MAX_ATTEMPTS: u32 = 10;

impl AccountNumberGenerator {
    /// Create a generator seeded from OS entropy
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Create a deterministic generator for tests
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }

    /// Draw a candidate number in the 7-digit range
    pub fn draw(&mut self) -> i64 {
        self.rng.gen_range(ACCOUNT_NUMBER_MIN..=ACCOUNT_NUMBER_MAX)
    }

    /// Allocate a number not used by any existing account.
    /// Checks each candidate against the repository within the caller's
    /// transaction and redraws on collision, up to the attempt ceiling.
    pub async fn allocate(
        &mut self,
        uow: &mut UnitOfWork,
        accounts: &AccountRepository,
    ) -> Result<i64, AppError> {
        for _ in 0..self.max_attempts {
            let candidate = self.draw();
            if !accounts.exists_by_number(uow, candidate).await? {
                return Ok(candidate);
            }
            tracing::debug!(candidate, "Account number taken, redrawing");
        }

        Err(DomainError::AccountNumberExhausted {
            attempts: self.max_attempts,
        }
        .into())
    }
}

impl Default for AccountNumberGenerator {
    fn default() -> Self {
        Self::new()
    }
}
