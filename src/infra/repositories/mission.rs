//! Mission repository.

use crate::domain::{CreateMission, Mission, UpdateMission};
use crate::errors::AppResult;
use crate::infra::postgrest::PostgrestClient;

use super::base::{
    BulkRepository, DeleteRepository, Include, OrderBy, QueryOptions, ReadRepository, Relation,
    Table, WriteRepository,
};

/// Table descriptor for `mission`
pub struct MissionTable;

impl Table for MissionTable {
    type Row = Mission;
    type Create = CreateMission;
    type Update = UpdateMission;
    type Key = String;

    const NAME: &'static str = "mission";
    const PRIMARY_KEY: &'static str = "slug";

    fn relations() -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[Relation::leaf("chapter")];
        RELATIONS
    }
}

/// Data access for campaign missions.
pub struct MissionRepository {
    client: PostgrestClient,
}

impl MissionRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// Missions of one chapter, in chapter order unless the caller
    /// ordered otherwise.
    pub async fn find_by_chapter(
        &self,
        chapter_slug: &str,
        options: QueryOptions,
    ) -> AppResult<Vec<Mission>> {
        self.find_all(&chapter_scope(chapter_slug, options)).await
    }

    /// One mission with its parent chapter embedded.
    pub async fn find_with_chapter(&self, slug: &str) -> AppResult<Mission> {
        self.find_by_id(&slug.to_string(), &Include::none().with("chapter"))
            .await
    }
}

fn chapter_scope(chapter_slug: &str, options: QueryOptions) -> QueryOptions {
    let options = options.filter("chapter_slug", chapter_slug);
    if options.order.is_some() {
        options
    } else {
        options.order(OrderBy::asc("index"))
    }
}

impl ReadRepository<MissionTable> for MissionRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl WriteRepository<MissionTable> for MissionRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl DeleteRepository<MissionTable> for MissionRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl BulkRepository<MissionTable> for MissionRepository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_embed_the_parent_chapter() {
        let names: Vec<_> = MissionTable::relations().iter().map(|r| r.name).collect();
        assert_eq!(names, ["chapter"]);
    }

    #[test]
    fn chapter_scope_filters_and_orders() {
        let options = chapter_scope("outskirts", QueryOptions::default());
        let pairs = options.to_query_pairs(MissionTable::relations());
        assert!(pairs.contains(&("chapter_slug".to_string(), "eq.outskirts".to_string())));
        assert!(pairs.contains(&("order".to_string(), "index.asc".to_string())));
    }
}
