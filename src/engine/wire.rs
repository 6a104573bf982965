//! Serialized engine answers
//!
//! Engines answer with a JSON rendering of the travel `QueryAnswer` message:
//!
//! ```json
//! {
//!   "ok_status": true,
//!   "error_msg": { "msg": "" },
//!   "place_list": { "place": [ {
//!     "tvl_code": { "code": "NCE" },
//!     "name": "Nice Cote d'Azur",
//!     "coord": { "latitude": 43.6584, "longitude": 7.2159 },
//!     "corrected_keyword_list": { "word": ["nce"] }
//!   } ] },
//!   "unmatched_keyword_list": { "word": [] }
//! }
//! ```
//!
//! Nothing outside this module depends on that layout.

use crate::coord::Coordinates;
use crate::engine::{Place, QueryAnswer};
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireAnswer {
    #[serde(default)]
    ok_status: bool,
    #[serde(default)]
    error_msg: WireErrorMsg,
    #[serde(default)]
    place_list: WirePlaceList,
    #[serde(default)]
    unmatched_keyword_list: WireWordList,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireErrorMsg {
    #[serde(default)]
    msg: String,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WirePlaceList {
    #[serde(default)]
    place: Vec<WirePlace>,
}

#[derive(Debug, Serialize, Deserialize)]
struct WirePlace {
    tvl_code: WireCode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    coord: WireCoord,
    #[serde(default)]
    corrected_keyword_list: WireWordList,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireCode {
    code: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct WireCoord {
    latitude: f64,
    longitude: f64,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct WireWordList {
    #[serde(default)]
    word: Vec<String>,
}

/// Decode a serialized engine answer
///
/// Place coordinates are validated; an out-of-range coordinate makes the
/// whole answer malformed.
pub fn parse_answer(raw: &[u8]) -> Result<QueryAnswer> {
    let wire: WireAnswer =
        serde_json::from_slice(raw).map_err(|e| Error::Answer(e.to_string()))?;

    if !wire.ok_status {
        let msg = if wire.error_msg.msg.is_empty() {
            "Unknown error".to_string()
        } else {
            wire.error_msg.msg
        };
        return Ok(QueryAnswer::failure(msg));
    }

    let places = wire
        .place_list
        .place
        .into_iter()
        .map(|p| {
            let coordinates = Coordinates::new(p.coord.latitude, p.coord.longitude);
            coordinates
                .validate()
                .map_err(|e| Error::Answer(format!("place {}: {}", p.tvl_code.code, e)))?;

            Ok(Place {
                code: p.tvl_code.code,
                name: p.name,
                coordinates,
                corrected_keywords: p.corrected_keyword_list.word,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(QueryAnswer::success(places, wire.unmatched_keyword_list.word))
}

/// Serialize an answer in the engine wire format
pub fn encode_answer(answer: &QueryAnswer) -> Result<Vec<u8>> {
    let wire = WireAnswer {
        ok_status: answer.ok,
        error_msg: WireErrorMsg {
            msg: answer.error_message.clone().unwrap_or_default(),
        },
        place_list: WirePlaceList {
            place: answer
                .places
                .iter()
                .map(|p| WirePlace {
                    tvl_code: WireCode {
                        code: p.code.clone(),
                    },
                    name: p.name.clone(),
                    coord: WireCoord {
                        latitude: p.coordinates.lat,
                        longitude: p.coordinates.lon,
                    },
                    corrected_keyword_list: WireWordList {
                        word: p.corrected_keywords.clone(),
                    },
                })
                .collect(),
        },
        unmatched_keyword_list: WireWordList {
            word: answer.unmatched_keywords.clone(),
        },
    };

    Ok(serde_json::to_vec(&wire)?)
}
