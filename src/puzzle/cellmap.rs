//! `HashMap<(Row, Col), String>` doesn't round-trip through JSON directly —
//! object keys must be strings — so rebus maps serialize as a flat list of
//! `(row, col, answer)` triples instead.
use super::{Col, Row};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::collections::HashMap;

pub fn serialize<S>(map: &HashMap<(Row, Col), String>, ser: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    let entries: Vec<(Row, Col, &String)> = map.iter().map(|(&(r, c), v)| (r, c, v)).collect();
    entries.serialize(ser)
}

pub fn deserialize<'de, D>(de: D) -> Result<HashMap<(Row, Col), String>, D::Error>
where
    D: Deserializer<'de>,
{
    let entries = Vec::<(Row, Col, String)>::deserialize(de)?;
    Ok(entries.into_iter().map(|(r, c, v)| ((r, c), v)).collect())
}
