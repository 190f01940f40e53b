//! JSON response schemas, one per request kind.
//!
//! The schema rides along with every request so the provider returns a
//! single conforming document; the `required` lists here are the
//! structural contract the gateway's parse step enforces on the way back
//! in (via the serde model types).

use serde_json::{Value, json};

fn cost_breakdown() -> Value {
    json!({
        "type": "object",
        "properties": {
            "accommodation": {"type": "number", "description": "Estimated accommodation cost in USD."},
            "food": {"type": "number", "description": "Estimated food cost in USD."},
            "activities": {"type": "number", "description": "Estimated activities cost in USD."}
        },
        "required": ["accommodation", "food", "activities"]
    })
}

fn currency_info() -> Value {
    json!({
        "type": "object",
        "properties": {
            "code": {"type": "string", "description": "Three-letter currency code, e.g. EUR."},
            "symbol": {"type": "string", "description": "Currency symbol, e.g. €."},
            "usd_to_local_rate": {"type": "number", "description": "Approximate conversion rate from 1 USD to the local currency."},
            "usd_to_home_rate": {"type": "number", "description": "Approximate conversion rate from 1 USD to the traveler's home currency."}
        },
        "required": ["code", "symbol", "usd_to_local_rate", "usd_to_home_rate"]
    })
}

fn reference_link() -> Value {
    json!({
        "type": "object",
        "properties": {
            "title": {"type": "string"},
            "url": {"type": "string"}
        },
        "required": ["title", "url"]
    })
}

/// Schema for the destination suggestion list.
pub fn suggestion_list() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "name": {"type": "string", "description": "The suggested country's name."},
                "country": {"type": "string", "description": "The formal country name."},
                "description": {"type": "string", "description": "A short, compelling description (2-3 sentences)."},
                "visa_note": {"type": "string", "description": "Visa requirement summary, mentioning e-visa or visa-on-arrival availability."},
                "average_cost": {"type": "number", "description": "Estimated total cost in USD for a solo traveler, 7 days."},
                "cost_breakdown": cost_breakdown(),
                "currency": currency_info()
            },
            "required": ["name", "country", "description", "visa_note", "average_cost", "cost_breakdown", "currency"]
        }
    })
}

/// Schema for a single-country direct lookup.
pub fn country_brief() -> Value {
    json!({
        "type": "object",
        "properties": {
            "description": {"type": "string", "description": "A short, compelling description (2-3 sentences)."},
            "visa_note": {"type": "string", "description": "Visa requirement summary, mentioning e-visa or visa-on-arrival availability."},
            "average_cost": {"type": "number", "description": "Estimated total cost in USD for a solo traveler, 7 days."},
            "cost_breakdown": cost_breakdown(),
            "currency": currency_info()
        },
        "required": ["description", "visa_note", "average_cost", "cost_breakdown", "currency"]
    })
}

fn activity() -> Value {
    json!({
        "type": "object",
        "properties": {
            "name": {"type": "string"},
            "description": {"type": "string"},
            "city": {"type": "string"},
            "kind": {"type": "string", "enum": ["Touristy", "Off-beat"]},
            "average_cost": {"type": "number", "description": "Estimated cost in USD."},
            "cost_breakdown": cost_breakdown(),
            "lat": {"type": "number"},
            "lng": {"type": "number"},
            "duration": {"type": "string", "description": "e.g. '2-3 hours'."},
            "visiting_tip": {"type": "string", "description": "A concise, actionable tip, e.g. 'Book tickets online in advance'."},
            "links": {"type": "array", "items": reference_link(), "description": "Up to 3 reference links; no Wikipedia."}
        },
        "required": ["name", "description", "city", "kind", "average_cost", "cost_breakdown", "lat", "lng", "links"]
    })
}

fn travel_leg() -> Value {
    json!({
        "type": "object",
        "properties": {
            "from_city": {"type": "string"},
            "to_city": {"type": "string"},
            "options": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "mode": {"type": "string", "description": "e.g. Train, Bus, Flight."},
                        "duration": {"type": "string", "description": "e.g. '4 hours'."},
                        "cost": {"type": "number", "description": "Estimated cost in USD."},
                        "description": {"type": "string"}
                    },
                    "required": ["mode", "duration", "cost"]
                }
            }
        },
        "required": ["from_city", "to_city", "options"]
    })
}

fn day_plan() -> Value {
    json!({
        "type": "object",
        "properties": {
            "day": {"type": "integer"},
            "title": {"type": "string", "description": "A catchy title for the day."},
            "activities": {"type": "array", "items": activity()},
            "tips": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "kind": {"type": "string", "enum": ["do", "dont", "warning", "info"]},
                        "tip": {"type": "string"}
                    },
                    "required": ["kind", "tip"]
                }
            },
            "travel": {
                "type": "array",
                "items": travel_leg(),
                "description": "Inter-city travel for the day. One entry when the base city changes; exactly two entries (outbound and return) for a same-day round trip."
            },
            "weather": {"type": "string", "description": "Brief general forecast for the city on this day, given the time of year."}
        },
        "required": ["day", "title", "activities", "tips"]
    })
}

/// Schema for a full travel plan.
pub fn plan() -> Value {
    json!({
        "type": "object",
        "properties": {
            "days": {"type": "array", "items": day_plan()},
            "optimization_note": {"type": "string", "description": "How to best execute the plan: reorderings, savings, pacing."},
            "official_links": {"type": "array", "items": reference_link(), "description": "Official tourism and visa resources."},
            "city_stay_costs": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "city": {"type": "string"},
                        "estimated_cost": {"type": "number", "description": "Total for all nights in this city, USD."},
                        "nights": {"type": "integer"}
                    },
                    "required": ["city", "estimated_cost", "nights"]
                }
            }
        },
        "required": ["days", "optimization_note", "official_links", "city_stay_costs"]
    })
}

/// Schema for a categorized packing list.
pub fn packing_list() -> Value {
    json!({
        "type": "array",
        "items": {
            "type": "object",
            "properties": {
                "category": {"type": "string"},
                "items": {"type": "array", "items": {"type": "string"}}
            },
            "required": ["category", "items"]
        }
    })
}
