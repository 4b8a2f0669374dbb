use std::collections::BTreeSet;
use crate::core::domain::Identifiable;
use crate::core::library::BookStatus;

pub mod model;

pub(crate) trait Book: Identifiable {
    fn code(&self) -> &str;
    fn statuses(&self) -> &BTreeSet<BookStatus>;

    fn is_available(&self) -> bool {
        self.statuses().contains(&BookStatus::Available)
    }
}
