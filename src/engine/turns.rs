//! Turn ages
//!
//! A turn is one user prompt plus everything that follows it up to the next
//! user prompt. Ages count backward from the newest turn, which is age 0.

use crate::transcript::Message;

/// Assign every message its turn age.
///
/// Scans from the newest message to the oldest: the message gets the current
/// age first, and crossing a user message bumps the age for everything older.
pub fn compute_turn_ages(messages: &[Message]) -> Vec<usize> {
    let mut ages = vec![0; messages.len()];
    let mut current_age = 0;

    for (i, message) in messages.iter().enumerate().rev() {
        ages[i] = current_age;
        if message.is_user() {
            current_age += 1;
        }
    }

    ages
}
