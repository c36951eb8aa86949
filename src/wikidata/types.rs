use std::collections::HashMap;
use std::fmt;

use serde::de::{self, Deserializer, MapAccess, SeqAccess, Visitor};
use serde::Deserialize;

/// Response from `action=wbgetentities`.
#[derive(Deserialize, Debug, Default)]
pub struct EntitiesResponse {
    /// Entities in response order, keyed by QID (or `-1`, `-2`… for unknown titles).
    #[serde(default, deserialize_with = "ordered_entities")]
    pub entities: Vec<(String, Entity)>,
    pub error: Option<ApiError>,
}

impl EntitiesResponse {
    /// Entities that actually exist, in response order.
    pub fn found(&self) -> impl Iterator<Item = &Entity> {
        self.entities
            .iter()
            .map(|(_, entity)| entity)
            .filter(|entity| !entity.is_missing())
    }

    pub fn get(&self, key: &str) -> Option<&Entity> {
        self.entities
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, entity)| entity)
    }
}

#[derive(Deserialize, Debug)]
pub struct ApiError {
    pub code: Option<String>,
    pub info: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct Entity {
    pub id: Option<String>,
    /// Present (as an empty string) when the title or id does not exist.
    pub missing: Option<String>,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub claims: HashMap<String, Vec<Statement>>,
    #[serde(default, deserialize_with = "map_or_empty_list")]
    pub sitelinks: HashMap<String, SiteLink>,
}

impl Entity {
    pub fn is_missing(&self) -> bool {
        self.missing.is_some()
    }

    /// Value of the first statement for `property`, if it carries one.
    pub fn first_value(&self, property: &str) -> Option<&serde_json::Value> {
        self.claims
            .get(property)?
            .first()?
            .mainsnak
            .datavalue
            .as_ref()
            .map(|dv| &dv.value)
    }

    /// First statement of `property` read as an item reference (`Q…`).
    pub fn first_entity_id(&self, property: &str) -> Option<&str> {
        self.first_value(property)?.get("id")?.as_str()
    }

    /// First statement of `property` read as a plain string.
    pub fn first_string(&self, property: &str) -> Option<&str> {
        self.first_value(property)?.as_str()
    }

    pub fn sitelink_title(&self, site: &str) -> Option<&str> {
        self.sitelinks.get(site).map(|link| link.title.as_str())
    }
}

#[derive(Deserialize, Debug)]
pub struct Statement {
    pub mainsnak: Snak,
}

/// `datavalue` is absent for `novalue` and `somevalue` snaks.
#[derive(Deserialize, Debug)]
pub struct Snak {
    pub datavalue: Option<DataValue>,
}

#[derive(Deserialize, Debug)]
pub struct DataValue {
    pub value: serde_json::Value,
}

#[derive(Deserialize, Debug)]
pub struct SiteLink {
    pub title: String,
}

fn ordered_entities<'de, D>(deserializer: D) -> Result<Vec<(String, Entity)>, D::Error>
where
    D: Deserializer<'de>,
{
    struct OrderedVisitor;

    impl<'de> Visitor<'de> for OrderedVisitor {
        type Value = Vec<(String, Entity)>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("a map of entities")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::with_capacity(map.size_hint().unwrap_or(1));
            while let Some(entry) = map.next_entry::<String, Entity>()? {
                out.push(entry);
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(OrderedVisitor)
}

/// Wikibase serializes an empty object as `[]`; accept both shapes.
fn map_or_empty_list<'de, D, V>(deserializer: D) -> Result<HashMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de>,
{
    struct MapOrList<V>(std::marker::PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for MapOrList<V> {
        type Value = HashMap<String, V>;

        fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("an object or an empty array")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
            let mut out = HashMap::with_capacity(map.size_hint().unwrap_or(0));
            while let Some((key, value)) = map.next_entry::<String, V>()? {
                out.insert(key, value);
            }
            Ok(out)
        }

        fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
            if seq.next_element::<de::IgnoredAny>()?.is_some() {
                return Err(de::Error::invalid_length(1, &self));
            }
            Ok(HashMap::new())
        }
    }

    deserializer.deserialize_any(MapOrList(std::marker::PhantomData))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: serde_json::Value) -> EntitiesResponse {
        serde_json::from_value(json).unwrap()
    }

    #[test]
    fn keeps_response_order() {
        let response: EntitiesResponse = serde_json::from_str(
            r#"{"entities": {"Q9": {"id": "Q9"}, "Q1": {"id": "Q1"}, "Q5": {"id": "Q5"}}}"#,
        )
        .unwrap();
        let ids: Vec<_> = response.entities.iter().map(|(k, _)| k.as_str()).collect();
        assert_eq!(ids, ["Q9", "Q1", "Q5"]);
    }

    #[test]
    fn missing_title_is_filtered_from_found() {
        let response = parse(serde_json::json!({
            "entities": {"-1": {"site": "enwiki", "title": "Nope", "missing": ""}},
            "success": 1
        }));
        assert_eq!(response.entities.len(), 1);
        assert_eq!(response.found().count(), 0);
    }

    #[test]
    fn reads_item_and_string_claims() {
        let response = parse(serde_json::json!({
            "entities": {"Q1": {
                "id": "Q1",
                "claims": {
                    "P364": [{"mainsnak": {"snaktype": "value", "datavalue": {
                        "value": {"entity-type": "item", "numeric-id": 652, "id": "Q652"},
                        "type": "wikibase-entityid"
                    }}}],
                    "P424": [{"mainsnak": {"snaktype": "value", "datavalue": {
                        "value": "it", "type": "string"
                    }}}]
                }
            }}
        }));
        let entity = response.get("Q1").unwrap();
        assert_eq!(entity.first_entity_id("P364"), Some("Q652"));
        assert_eq!(entity.first_string("P424"), Some("it"));
        assert_eq!(entity.first_string("P364"), None);
        assert_eq!(entity.first_entity_id("P407"), None);
    }

    #[test]
    fn novalue_snak_has_no_value() {
        let response = parse(serde_json::json!({
            "entities": {"Q1": {"id": "Q1", "claims": {
                "P364": [{"mainsnak": {"snaktype": "novalue"}}]
            }}}
        }));
        assert_eq!(response.get("Q1").unwrap().first_entity_id("P364"), None);
    }

    #[test]
    fn empty_list_claims_and_sitelinks_are_empty_maps() {
        let response = parse(serde_json::json!({
            "entities": {"Q1": {"id": "Q1", "claims": [], "sitelinks": []}}
        }));
        let entity = response.get("Q1").unwrap();
        assert!(entity.claims.is_empty());
        assert!(entity.sitelinks.is_empty());
    }

    #[test]
    fn non_empty_list_is_rejected() {
        let result: Result<EntitiesResponse, _> = serde_json::from_value(serde_json::json!({
            "entities": {"Q1": {"claims": [1]}}
        }));
        assert!(result.is_err());
    }

    #[test]
    fn reads_sitelinks() {
        let response = parse(serde_json::json!({
            "entities": {"Q1": {"id": "Q1", "sitelinks": {
                "itwiki": {"site": "itwiki", "title": "La luna e i falò", "badges": []}
            }}}
        }));
        let entity = response.get("Q1").unwrap();
        assert_eq!(entity.sitelink_title("itwiki"), Some("La luna e i falò"));
        assert_eq!(entity.sitelink_title("frwiki"), None);
    }

    #[test]
    fn error_body_is_captured() {
        let response = parse(serde_json::json!({
            "error": {"code": "no-such-entity", "info": "Could not find an entity"}
        }));
        assert!(response.entities.is_empty());
        assert_eq!(response.error.unwrap().code.as_deref(), Some("no-such-entity"));
    }
}
