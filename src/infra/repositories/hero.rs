//! Hero repository, including the pruned JSON export.

use serde_json::{Map, Value};

use crate::domain::{CreateHero, Hero, UpdateHero};
use crate::errors::{AppError, AppResult};
use crate::infra::postgrest::PostgrestClient;

use super::base::{
    BulkRepository, DeleteRepository, Include, OrderBy, QueryOptions, ReadRepository, Relation,
    Table, WriteRepository,
};

/// Table descriptor for `hero`
pub struct HeroTable;

impl Table for HeroTable {
    type Row = Hero;
    type Create = CreateHero;
    type Update = UpdateHero;
    type Key = String;

    const NAME: &'static str = "hero";
    const PRIMARY_KEY: &'static str = "slug";

    fn relations() -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            Relation::leaf("hero_artifact"),
            Relation::leaf("hero_skin"),
            Relation::leaf("hero_glyph"),
            Relation {
                name: "hero_equipment_slot",
                nested: &[Relation::leaf("equipment")],
            },
        ];
        RELATIONS
    }
}

/// Include tree covering every hero child table.
fn full_include() -> Include {
    Include::none()
        .with("hero_artifact")
        .with("hero_skin")
        .with("hero_glyph")
        .with("hero_equipment_slot")
}

/// Data access for heroes and their child tables.
pub struct HeroRepository {
    client: PostgrestClient,
}

impl HeroRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// One hero with artifacts, skins, glyphs, and equipment slots embedded.
    pub async fn find_complete(&self, slug: &str) -> AppResult<Hero> {
        self.find_by_id(&slug.to_string(), &full_include()).await
    }

    /// Every hero with all child rows, as a single JSON document with
    /// empty and defaulted fields pruned. This is the payload served at
    /// `/api/heroes/json` and written by the export command.
    pub async fn export_all(&self) -> AppResult<Value> {
        let options = QueryOptions::default()
            .order(OrderBy::asc("name"))
            .include(full_include());
        let heroes = self.find_all(&options).await?;

        let value = serde_json::to_value(heroes)
            .map_err(|e| AppError::internal(format!("export serialization failed: {}", e)))?;
        Ok(prune_empty(value))
    }
}

impl ReadRepository<HeroTable> for HeroRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl WriteRepository<HeroTable> for HeroRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl DeleteRepository<HeroTable> for HeroRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl BulkRepository<HeroTable> for HeroRepository {}

/// Recursively drop nulls, empty strings, and empty collections from an
/// export document. Scalar zeros and `false` are kept; they are data.
fn prune_empty(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let pruned: Map<String, Value> = map
                .into_iter()
                .map(|(k, v)| (k, prune_empty(v)))
                .filter(|(_, v)| !is_empty(v))
                .collect();
            Value::Object(pruned)
        }
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(prune_empty)
                .filter(|v| !is_empty(v))
                .collect(),
        ),
        other => other,
    }
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn prune_drops_nulls_and_empty_collections() {
        let doc = json!({
            "slug": "astaroth",
            "notes": null,
            "aliases": [],
            "meta": {},
            "hero_skin": [
                {"name": "default", "stat": "", "has_plus": false}
            ]
        });

        let pruned = prune_empty(doc);
        assert_eq!(
            pruned,
            json!({
                "slug": "astaroth",
                "hero_skin": [{"name": "default", "has_plus": false}]
            })
        );
    }

    #[test]
    fn prune_keeps_zero_and_false() {
        let pruned = prune_empty(json!({"stars": 0, "has_plus": false}));
        assert_eq!(pruned, json!({"stars": 0, "has_plus": false}));
    }

    #[test]
    fn prune_collapses_nested_emptiness() {
        let pruned = prune_empty(json!({"a": {"b": null}}));
        assert_eq!(pruned, json!({}));
    }

    #[test]
    fn relations_cover_every_child_table() {
        let relations = HeroTable::relations();
        let names: Vec<_> = relations.iter().map(|r| r.name).collect();
        assert_eq!(
            names,
            ["hero_artifact", "hero_skin", "hero_glyph", "hero_equipment_slot"]
        );

        let slot = relations
            .iter()
            .find(|r| r.name == "hero_equipment_slot")
            .expect("slot relation");
        assert_eq!(slot.nested[0].name, "equipment");
    }
}
