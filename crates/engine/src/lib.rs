//! Recurring-transaction core of Budget Buddy.
//!
//! - [`recurrence`] is the pure calendar rule: given a [`Frequency`] and a
//!   reference date it returns the next occurrence.
//! - [`Engine`] owns the store connection. It creates recurring rules and runs
//!   [`Engine::generate_pending_transactions`], which materializes due
//!   occurrences, advances each rule's cursor and retires expired rules.
//!
//! Scheduling (when to call the run) is left to the caller.

pub use clock::{Clock, FixedClock, SystemClock};
pub use error::EngineError;
pub use ops::{Engine, EngineBuilder, GenerationReport};
pub use recurrence::{Frequency, calculate_next_occurrence, next_occurrence};
pub use recurring_rules::{NewRecurringRule, RecurringRule};
pub use transactions::{RECURRING_SUFFIX, Transaction};
pub use util::{format_amount_minor, parse_amount_minor};

mod clock;
mod error;
mod ops;
pub mod recurrence;
pub mod recurring_rules;
pub mod transactions;
mod util;

type ResultEngine<T> = Result<T, EngineError>;
