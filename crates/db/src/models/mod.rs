//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A `Deserialize` create DTO for inserts
//! - A `Deserialize` update DTO (all `Option` fields) for patches; fields
//!   that can be cleared are `Option<Option<T>>` read with [`double_option`]

pub mod builder;
pub mod checkin;
pub mod email_template;
pub mod event;
pub mod order;
pub mod participant;
pub mod sender;
pub mod session;
pub mod ticketing;
pub mod user;

use serde::{Deserialize, Deserializer};

/// Field absent -> `None`, `null` -> `Some(None)`, value -> `Some(Some(v))`.
///
/// Use with `#[serde(default, deserialize_with = "double_option")]`.
pub fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::ticketing::UpdateTicketType;
    use serde_json::json;

    #[test]
    fn absent_null_and_value_are_distinct() {
        let absent: UpdateTicketType = serde_json::from_value(json!({ "name": "VIP" })).unwrap();
        assert_eq!(absent.quota, None);

        let cleared: UpdateTicketType = serde_json::from_value(json!({ "quota": null })).unwrap();
        assert_eq!(cleared.quota, Some(None));

        let set: UpdateTicketType = serde_json::from_value(json!({ "quota": 50 })).unwrap();
        assert_eq!(set.quota, Some(Some(50)));
    }
}
