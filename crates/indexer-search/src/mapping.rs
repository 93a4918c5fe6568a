//! Analyzer settings and field mappings of the shared repository index

use serde_json::{json, Value};

/// Date format of commit author and committer times (`%Y%m%dT%H%M%S%z`)
pub const COMMIT_TIME_FORMAT: &str = "basic_date_time_no_millis";

/// Body of the create-index request: analysis settings plus mappings
pub fn index_definition() -> Value {
    json!({
        "settings": settings(),
        "mappings": mappings(),
    })
}

fn settings() -> Value {
    json!({
        "index": { "max_ngram_diff": 12 },
        "analysis": {
            "analyzer": {
                "path_analyzer": {
                    "type": "custom",
                    "tokenizer": "path_tokenizer",
                    "filter": ["lowercase", "asciifolding", "path_ngrams"]
                },
                "code_analyzer": {
                    "type": "custom",
                    "tokenizer": "standard",
                    "filter": ["lowercase", "asciifolding", "code_stemmer"]
                }
            },
            "tokenizer": {
                "path_tokenizer": { "type": "path_hierarchy", "reverse": true }
            },
            "filter": {
                "path_ngrams": { "type": "edge_ngram", "min_gram": 3, "max_gram": 15 },
                "code_stemmer": { "type": "stemmer", "language": "minimal_english" }
            }
        }
    })
}

fn code_text() -> Value {
    json!({ "type": "text", "index_options": "offsets", "analyzer": "code_analyzer" })
}

fn signature() -> Value {
    json!({
        "properties": {
            "name": code_text(),
            "email": code_text(),
            "time": { "type": "date", "format": COMMIT_TIME_FORMAT }
        }
    })
}

fn mappings() -> Value {
    json!({
        "properties": {
            "type": { "type": "keyword" },
            "indexed_at": { "type": "date" },
            "blob": {
                "properties": {
                    "rid": { "type": "keyword" },
                    "oid": code_text(),
                    "commit_sha": code_text(),
                    "path": { "type": "text", "analyzer": "path_analyzer" },
                    // the fast vector highlighter needs term vectors
                    "content": {
                        "type": "text",
                        "analyzer": "code_analyzer",
                        "term_vector": "with_positions_offsets"
                    },
                    "language": { "type": "keyword" }
                }
            },
            "commit": {
                "properties": {
                    "rid": { "type": "keyword" },
                    "sha": code_text(),
                    "author": signature(),
                    "committer": signature(),
                    "message": code_text()
                }
            }
        }
    })
}
