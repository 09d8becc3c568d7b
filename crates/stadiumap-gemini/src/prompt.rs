//! Prompts and response schemas for the three Gemini calls.

use serde_json::{json, Value};
use stadiumap_core::{Bounds, Stadium};

pub(crate) fn area_scan(bounds: &Bounds, max_results: u32) -> String {
    format!(
        "List up to {max_results} major professional football (soccer) stadiums located \
         STRICTLY within this geographic bounding box: North Lat: {north}, South Lat: {south}, \
         East Lng: {east}, West Lng: {west}.\n\
         Focus on top-tier league stadiums, national stadiums, or historically significant \
         grounds. Do NOT invent stadiums. If fewer than {max_results} exist in this exact box, \
         return only the real ones.\n\
         Ensure coordinates are as precise as possible. The 'id' should be a kebab-case string \
         of the stadium name (e.g., 'camp-nou').",
        north = bounds.north,
        south = bounds.south,
        east = bounds.east,
        west = bounds.west,
    )
}

pub(crate) fn stadium_search(query: &str) -> String {
    format!(
        "Find the football stadium matching the search query: \"{query}\".\n\
         Return full details including precise coordinates.\n\
         If the query is not a real football stadium, return null."
    )
}

pub(crate) fn insight(stadium: &Stadium) -> String {
    format!(
        "Provide a short, engaging description (max 50 words) and one unique, interesting fun \
         fact about the football stadium \"{name}\" located in {city}.\n\
         The description should mention its historical significance or atmosphere.\n\
         The fun fact should be surprising.",
        name = stadium.name,
        city = stadium.city,
    )
}

fn stadium_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "id": { "type": "STRING" },
            "name": { "type": "STRING" },
            "commonName": { "type": "STRING", "nullable": true },
            "city": { "type": "STRING" },
            "country": { "type": "STRING" },
            "capacity": { "type": "NUMBER" },
            "homeTeams": { "type": "ARRAY", "items": { "type": "STRING" } },
            "coordinates": {
                "type": "OBJECT",
                "properties": {
                    "lat": { "type": "NUMBER" },
                    "lng": { "type": "NUMBER" }
                },
                "required": ["lat", "lng"]
            },
            "imageUrl": {
                "type": "STRING",
                "description": "A generic placeholder URL if real one not known, or leave empty."
            }
        },
        "required": ["id", "name", "city", "country", "capacity", "homeTeams", "coordinates"]
    })
}

pub(crate) fn area_scan_schema() -> Value {
    json!({ "type": "ARRAY", "items": stadium_schema() })
}

pub(crate) fn stadium_search_schema() -> Value {
    let mut schema = stadium_schema();
    schema["nullable"] = Value::Bool(true);
    schema
}

pub(crate) fn insight_schema() -> Value {
    json!({
        "type": "OBJECT",
        "properties": {
            "description": {
                "type": "STRING",
                "description": "A short engaging description of the stadium."
            },
            "funFact": {
                "type": "STRING",
                "description": "A unique fun fact about the stadium."
            }
        },
        "required": ["description", "funFact"]
    })
}
