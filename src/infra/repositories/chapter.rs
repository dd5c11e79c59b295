//! Chapter repository.

use crate::domain::{Chapter, CreateChapter, UpdateChapter};
use crate::errors::AppResult;
use crate::infra::postgrest::PostgrestClient;

use super::base::{
    BulkRepository, DeleteRepository, OrderBy, QueryOptions, ReadRepository, Relation, Table,
    WriteRepository,
};

/// Table descriptor for `chapter`
pub struct ChapterTable;

impl Table for ChapterTable {
    type Row = Chapter;
    type Create = CreateChapter;
    type Update = UpdateChapter;
    type Key = String;

    const NAME: &'static str = "chapter";
    const PRIMARY_KEY: &'static str = "slug";

    fn relations() -> &'static [Relation] {
        const RELATIONS: &[Relation] = &[Relation::leaf("mission")];
        RELATIONS
    }
}

/// Data access for campaign chapters.
pub struct ChapterRepository {
    client: PostgrestClient,
}

impl ChapterRepository {
    pub fn new(client: PostgrestClient) -> Self {
        Self { client }
    }

    /// List chapters, in campaign order unless the caller ordered
    /// otherwise.
    pub async fn find_ordered(&self, options: QueryOptions) -> AppResult<Vec<Chapter>> {
        self.find_all(&campaign_order(options)).await
    }
}

fn campaign_order(options: QueryOptions) -> QueryOptions {
    if options.order.is_some() {
        options
    } else {
        options.order(OrderBy::asc("index"))
    }
}

impl ReadRepository<ChapterTable> for ChapterRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl WriteRepository<ChapterTable> for ChapterRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl DeleteRepository<ChapterTable> for ChapterRepository {
    fn client(&self) -> &PostgrestClient {
        &self.client
    }
}

impl BulkRepository<ChapterTable> for ChapterRepository {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relations_embed_missions() {
        let names: Vec<_> = ChapterTable::relations().iter().map(|r| r.name).collect();
        assert_eq!(names, ["mission"]);
    }

    #[test]
    fn campaign_order_is_the_default() {
        let options = campaign_order(QueryOptions::default());
        let pairs = options.to_query_pairs(ChapterTable::relations());
        assert!(pairs.contains(&("order".to_string(), "index.asc".to_string())));
    }

    #[test]
    fn explicit_order_wins_over_campaign_order() {
        let options = campaign_order(QueryOptions::default().order(OrderBy::desc("name")));
        let pairs = options.to_query_pairs(ChapterTable::relations());
        assert!(pairs.contains(&("order".to_string(), "name.desc".to_string())));
    }
}
