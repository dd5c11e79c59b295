//! Equipment repository.

use crate::domain::{CreateEquipment, Equipment, EquipmentType, UpdateEquipment};
use crate::errors::AppResult;
use crate::infra::postgrest::PostgrestClient;

use super::base::{
    BulkRepository, DeleteRepository, Include, OrderBy, QueryOptions, ReadRepository, Relation,
    Table, WriteRepository,
};

/// Table descriptor for `equipment`
pub struct EquipmentTable;

impl Table for EquipmentTable {
    type Row = Equipment;
    type Create = CreateEquipment;
    type Update = UpdateEquipment;
    type Key = String;

    const NAME: &'static str = "equipment";
    const PRIMARY_KEY: &'static str = "slug";

    fn relations() -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[
            Relation::leaf("equipment_stat"),
            Relation::leaf("equipment_required_item"),
        ];
        RELATIONS
    }
}

/// Data access for equipment items.
pub struct EquipmentRepository {
    client: PostgrestClient,
}

impl EquipmentRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// Items of one type (e.g. craftable recipes), by name unless the
    /// caller ordered otherwise.
    pub async fn find_by_type(
        &self,
        kind: EquipmentType,
        options: QueryOptions,
    ) -> AppResult<Vec<Equipment>> {
        self.find_all(&type_scope(kind, options)).await
    }

    /// One item with its stat lines and crafting requirements embedded.
    pub async fn find_with_components(&self, slug: &str) -> AppResult<Equipment> {
        let include = Include::none()
            .with("equipment_stat")
            .with("equipment_required_item");
        self.find_by_id(&slug.to_string(), &include).await
    }
}

fn type_scope(kind: EquipmentType, options: QueryOptions) -> QueryOptions {
    let options = options.filter("type", kind.as_str());
    if options.order.is_some() {
        options
    } else {
        options.order(OrderBy::asc("name"))
    }
}

impl ReadRepository<EquipmentTable> for EquipmentRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl WriteRepository<EquipmentTable> for EquipmentRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl DeleteRepository<EquipmentTable> for EquipmentRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl BulkRepository<EquipmentTable> for EquipmentRepository {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::repositories::build_select_clause;

    #[test]
    fn relations_embed_both_detail_tables() {
        let names: Vec<_> = EquipmentTable::relations().iter().map(|r| r.name).collect();
        assert_eq!(names, ["equipment_stat", "equipment_required_item"]);
    }

    #[test]
    fn type_scope_filters_and_orders() {
        let options = type_scope(EquipmentType::Recipe, QueryOptions::default());
        let pairs = options.to_query_pairs(EquipmentTable::relations());
        assert!(pairs.contains(&("type".to_string(), "eq.recipe".to_string())));
        assert!(pairs.contains(&("order".to_string(), "name.asc".to_string())));
    }

    #[test]
    fn component_include_renders_nested_projection() {
        let include = Include::none()
            .with("equipment_stat")
            .with("equipment_required_item");
        assert_eq!(
            build_select_clause(&include, EquipmentTable::relations()),
            "*,equipment_required_item(*),equipment_stat(*)"
        );
    }
}
