//! PokeAPI client for the catalog window.

use std::sync::OnceLock;

use serde::Deserialize;
use tokio::task::JoinSet;

use crate::state::{CatalogEntry, PokemonDetail, PokemonStat, BASE_OFFSET, DEX_SIZE};

const API_BASE: &str = "https://pokeapi.co/api/v2";

#[derive(Debug)]
pub enum ApiError {
    Request(reqwest::Error),
    NotFound(String),
    TaskFailed(String),
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ApiError::Request(err) => write!(f, "Request failed: {}", err),
            ApiError::NotFound(key) => write!(f, "No record for key: {}", key),
            ApiError::TaskFailed(err) => write!(f, "Fetch task failed: {}", err),
        }
    }
}

impl std::error::Error for ApiError {}

#[derive(Clone, Debug, Deserialize)]
struct NamedResource {
    name: String,
    url: String,
}

#[derive(Clone, Debug, Deserialize)]
struct ListResponse {
    results: Vec<NamedResource>,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonResponse {
    id: u16,
    name: String,
    types: Vec<PokemonTypeSlot>,
    stats: Vec<PokemonStatSlot>,
    sprites: serde_json::Value,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonTypeSlot {
    #[serde(rename = "type")]
    type_info: NamedResource,
}

#[derive(Clone, Debug, Deserialize)]
struct PokemonStatSlot {
    base_stat: u16,
    stat: NamedResource,
}

/// Fetch the restricted-range list window in one request.
pub async fn fetch_catalog() -> Result<Vec<CatalogEntry>, ApiError> {
    let url = format!("{API_BASE}/pokemon?limit={DEX_SIZE}&offset={BASE_OFFSET}");
    let response = http_client()
        .get(&url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    let response = response.error_for_status().map_err(ApiError::Request)?;
    let body: ListResponse = response.json().await.map_err(ApiError::Request)?;
    Ok(body
        .results
        .into_iter()
        .map(|entry| CatalogEntry {
            name: entry.name,
            url: entry.url,
        })
        .collect())
}

/// Fetch a detail record by numeric id or lowercase name.
pub async fn fetch_detail(key: &str) -> Result<PokemonDetail, ApiError> {
    let url = format!("{API_BASE}/pokemon/{key}");
    fetch_detail_url(&url, key).await
}

/// Resolve every entry of a batch concurrently. Results come back in the
/// slice's order regardless of response arrival; any failure fails the
/// whole batch and aborts the rest.
pub async fn fetch_chunk(entries: &[CatalogEntry]) -> Result<Vec<PokemonDetail>, ApiError> {
    if entries.is_empty() {
        return Ok(Vec::new());
    }

    let mut join_set = JoinSet::new();
    for (index, entry) in entries.iter().enumerate() {
        let url = entry.url.clone();
        let name = entry.name.clone();
        join_set.spawn(async move { (index, fetch_detail_url(&url, &name).await) });
    }

    let mut slots: Vec<Option<PokemonDetail>> = (0..entries.len()).map(|_| None).collect();
    while let Some(joined) = join_set.join_next().await {
        let (index, result) = joined.map_err(|err| ApiError::TaskFailed(err.to_string()))?;
        slots[index] = Some(result?);
    }
    Ok(slots.into_iter().flatten().collect())
}

async fn fetch_detail_url(url: &str, key: &str) -> Result<PokemonDetail, ApiError> {
    let response = http_client()
        .get(url)
        .send()
        .await
        .map_err(ApiError::Request)?;
    if response.status() == reqwest::StatusCode::NOT_FOUND {
        return Err(ApiError::NotFound(key.to_string()));
    }
    let response = response.error_for_status().map_err(ApiError::Request)?;
    let body: PokemonResponse = response.json().await.map_err(ApiError::Request)?;
    Ok(detail_from_response(body))
}

fn detail_from_response(response: PokemonResponse) -> PokemonDetail {
    let types = response
        .types
        .into_iter()
        .map(|slot| slot.type_info.name)
        .collect();
    let stats = response
        .stats
        .into_iter()
        .map(|slot| PokemonStat {
            name: slot.stat.name,
            value: slot.base_stat,
        })
        .collect();
    let sprite_front_default = pointer_string(&response.sprites, "/front_default")
        .or_else(|| {
            pointer_string(
                &response.sprites,
                "/versions/generation-i/red-blue/front_transparent",
            )
        })
        .or_else(|| {
            pointer_string(
                &response.sprites,
                "/versions/generation-i/yellow/front_transparent",
            )
        });

    PokemonDetail {
        id: response.id,
        name: response.name,
        types,
        stats,
        sprite_front_default,
    }
}

fn pointer_string(value: &serde_json::Value, pointer: &str) -> Option<String> {
    value
        .pointer(pointer)
        .and_then(|val| val.as_str())
        .map(|s| s.to_string())
}

fn http_client() -> &'static reqwest::Client {
    static CLIENT: OnceLock<reqwest::Client> = OnceLock::new();
    CLIENT.get_or_init(reqwest::Client::new)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_from_response_keeps_order_and_falls_back() {
        let body: PokemonResponse = serde_json::from_value(serde_json::json!({
            "id": 448,
            "name": "lucario",
            "types": [
                {"type": {"name": "fighting", "url": ""}},
                {"type": {"name": "steel", "url": ""}}
            ],
            "stats": [
                {"base_stat": 70, "stat": {"name": "hp", "url": ""}},
                {"base_stat": 110, "stat": {"name": "attack", "url": ""}}
            ],
            "sprites": {
                "front_default": null,
                "versions": {
                    "generation-i": {
                        "red-blue": {"front_transparent": "http://sprites/rb.png"}
                    }
                }
            }
        }))
        .expect("valid fixture");

        let detail = detail_from_response(body);
        assert_eq!(detail.types, vec!["fighting", "steel"]);
        assert_eq!(detail.stat("attack"), 110);
        assert_eq!(
            detail.sprite_front_default.as_deref(),
            Some("http://sprites/rb.png")
        );
    }
}
