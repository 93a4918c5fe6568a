//! Query payloads for blob, commit and filename search

use indexer_core::{CoreError, DocumentKind, IndexSettings, QuerySpec, SortOrder};
use serde_json::{json, Map, Value};

/// Opening marker wrapped around highlighted matches
pub const HIGHLIGHT_PRE_TAG: &str = "gitlabelasticsearch→";
/// Closing marker wrapped around highlighted matches
pub const HIGHLIGHT_POST_TAG: &str = "←gitlabelasticsearch";

/// Aggregation names used in blob and commit queries
pub const LANGUAGE_FACET: &str = "languageFacet";
pub const BLOB_REPOSITORY_FACET: &str = "blobRepositoryFacet";
pub const COMMIT_REPOSITORY_FACET: &str = "commitRepositoryFacet";

/// Commit fields searched by free text, with their boosts
const COMMIT_FIELDS: [(&str, u32); 6] = [
    ("message", 10),
    ("sha", 5),
    ("author.name", 2),
    ("author.email", 2),
    ("committer.name", 1),
    ("committer.email", 1),
];

/// Builds search payloads from a [`QuerySpec`]
#[derive(Debug, Clone)]
pub struct SearchQueryBuilder {
    repositories_count: usize,
    languages_count: usize,
}

impl Default for SearchQueryBuilder {
    fn default() -> Self {
        Self::new(&IndexSettings::default())
    }
}

impl SearchQueryBuilder {
    pub fn new(settings: &IndexSettings) -> Self {
        Self {
            repositories_count: settings.repositories_count,
            languages_count: settings.languages_count,
        }
    }

    /// Full-text search over blob content
    ///
    /// All terms must match. Repository and language filters are exact-term
    /// filters; language and repository facets are always requested.
    pub fn blob_query(&self, spec: &QuerySpec) -> Result<Value, CoreError> {
        spec.validate()?;
        let kind = DocumentKind::Blob;

        let text_query = if spec.is_blank() {
            json!({ "match_all": {} })
        } else {
            json!({
                "match": {
                    kind.field("content"): { "query": spec.query, "operator": "and" }
                }
            })
        };

        let mut filters = vec![type_filter(kind)];
        if !spec.repository_ids.is_empty() {
            filters.push(terms_filter(&kind.field("rid"), &spec.repository_ids));
        }
        if !spec.languages.is_empty() {
            filters.push(terms_filter(&kind.field("language"), &spec.languages));
        }

        let mut payload = json!({
            "query": { "bool": { "must": [text_query], "filter": filters } },
            "aggs": {
                LANGUAGE_FACET: terms_facet(&kind.field("language"), self.languages_count),
                BLOB_REPOSITORY_FACET: terms_facet(&kind.field("rid"), self.repositories_count),
            },
            "size": spec.per,
            "from": spec.offset(),
            "sort": sort_clause(spec.order),
        });

        if spec.is_blank() {
            payload["track_scores"] = json!(true);
        }

        if spec.highlight {
            payload["highlight"] = json!({
                "pre_tags": [HIGHLIGHT_PRE_TAG],
                "post_tags": [HIGHLIGHT_POST_TAG],
                "fields": {
                    kind.field("content"): { "type": "fvh", "boundary_chars": "\n" }
                }
            });
        }

        Ok(payload)
    }

    /// Weighted multi-field search over commits
    ///
    /// Any field may match. A blank query matches every commit and turns on
    /// score tracking so the relevance sort still yields a stable order.
    pub fn commit_query(&self, spec: &QuerySpec) -> Result<Value, CoreError> {
        spec.validate()?;
        let kind = DocumentKind::Commit;

        let fields: Vec<String> = COMMIT_FIELDS
            .iter()
            .map(|(field, boost)| match boost {
                1 => kind.field(field),
                _ => format!("{}^{}", kind.field(field), boost),
            })
            .collect();

        let text_query = if spec.is_blank() {
            json!({ "match_all": {} })
        } else {
            json!({
                "multi_match": { "fields": fields, "query": spec.query, "operator": "or" }
            })
        };

        let mut filters = vec![type_filter(kind)];
        if !spec.repository_ids.is_empty() {
            filters.push(terms_filter(&kind.field("rid"), &spec.repository_ids));
        }

        let mut payload = json!({
            "query": { "bool": { "must": [text_query], "filter": filters } },
            "aggs": {
                COMMIT_REPOSITORY_FACET: terms_facet(&kind.field("rid"), self.repositories_count),
            },
            "size": spec.per,
            "from": spec.offset(),
            "sort": sort_clause(spec.order),
        });

        if spec.is_blank() {
            payload["track_scores"] = json!(true);
        }

        if spec.highlight {
            let highlight_fields: Map<String, Value> = COMMIT_FIELDS
                .iter()
                .map(|(field, _)| (kind.field(field), json!({})))
                .collect();
            payload["highlight"] = json!({
                "pre_tags": [HIGHLIGHT_PRE_TAG],
                "post_tags": [HIGHLIGHT_POST_TAG],
                "fields": highlight_fields,
            });
        }

        Ok(payload)
    }

    /// Fuzzy match on blob paths inside the given repositories
    ///
    /// At least one repository id is required. Results are ranked by fuzzy
    /// score only: no facets, highlighting or ordering options apply.
    pub fn filename_query(&self, spec: &QuerySpec) -> Result<Value, CoreError> {
        spec.validate()?;
        if spec.repository_ids.is_empty() {
            return Err(CoreError::InvalidQuery(
                "filename search requires a repository id".to_string(),
            ));
        }
        let kind = DocumentKind::Blob;

        let path_query = if spec.is_blank() {
            json!({ "match_all": {} })
        } else {
            json!({ "fuzzy": { kind.field("path"): { "value": spec.query.trim() } } })
        };

        Ok(json!({
            "_source": [kind.field("path")],
            "query": {
                "bool": {
                    "must": [path_query],
                    "filter": [
                        type_filter(kind),
                        terms_filter(&kind.field("rid"), &spec.repository_ids),
                    ]
                }
            },
            "size": spec.per,
            "from": spec.offset(),
        }))
    }
}

fn type_filter(kind: DocumentKind) -> Value {
    json!({ "term": { "type": kind.as_str() } })
}

fn terms_filter(field: &str, values: &[String]) -> Value {
    json!({ "terms": { field: values } })
}

/// `min_doc_count: 0` keeps zero-count terms, like the legacy `all_terms`
fn terms_facet(field: &str, size: usize) -> Value {
    json!({ "terms": { "field": field, "size": size, "min_doc_count": 0 } })
}

fn sort_clause(order: SortOrder) -> Value {
    let direction = match order {
        SortOrder::Default => return json!(["_score"]),
        SortOrder::RecentlyIndexed => "desc",
        SortOrder::LastIndexed => "asc",
    };
    json!([
        { "indexed_at": { "order": direction, "mode": "min" } },
        "_score"
    ])
}
