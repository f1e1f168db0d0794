// ===============================
// src/lib.rs
// ===============================
/*
=============================================================================
Project : group_ledger — client-side core for a group-expense ledger
Module  : lib.rs
Version : 0.1.0
License : MIT (see LICENSE)

Summary : Validates in-progress expense / payment / group drafts into
          submittable payloads, merges expense and payment streams into a
          time-ordered activity feed, and samples bounded chart series.
          Pure and synchronous: the ledger service owns balances and
          persistence, this crate only gates and reshapes data.
=============================================================================
*/
pub mod domain;
pub mod numeric;
pub mod display;
pub mod validator;   // expense split allocation
pub mod payment;     // settlement drafts
pub mod group;       // group creation drafts
pub mod activity;    // unified feed
pub mod series;      // chart samples

pub use activity::{aggregate, aggregate_with_report, AggregateReport};
pub use domain::{
    ActivityEntry, ExpenseRecord, Member, MemberDirectory, MemberId, PaymentRecord, RoomId,
    SplitDetail, SplitType, TimeSeriesPoint,
};
pub use series::{sample_time_series, sample_time_series_with, SeriesEvent, SeriesOptions};
pub use validator::{validate, DraftAllocation, ValidatedAllocation, ValidationError};
