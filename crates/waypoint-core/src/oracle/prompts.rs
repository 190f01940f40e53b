//! Prompt construction, one builder per request kind.
//!
//! Pure string assembly; the gateway pairs each prompt with its schema
//! from [`super::schema`]. The refinement builder is the only one with
//! conditional sections (the exclusion block).

use crate::model::{DayPlan, ItineraryStyle};

/// Shared activity-detail requirements included in every plan prompt.
const ACTIVITY_RULES: &str = "For each activity within a day provide:\n\
- Name, city, a short description, and whether it is 'Touristy' or 'Off-beat'.\n\
- Lat/lng coordinates.\n\
- Estimated duration (e.g. \"2-3 hours\").\n\
- A concise visiting tip (e.g. \"Book online to save time\" or \"Visit early to avoid crowds\").\n\
- Estimated cost in USD with a breakdown.\n\
- Up to 3 reference links, as from a web search for the activity's name. \
Exclude Wikipedia; prefer official sites, ticket vendors, and reputable guides.\n";

/// Shared travel-leg requirements included in every plan prompt.
const TRAVEL_RULES: &str = "Include travel legs per day. For days where the base city changes, \
the day's travel array has a single entry. For same-day round trips (e.g. Florence to Pisa and \
back), it MUST have two entries: one outbound, one return. All costs in USD.\n";

/// Destination suggestions for a budget/season/continent query.
pub fn suggestions(budget: &str, season: &str, continent: &str) -> String {
    format!(
        "You are an expert travel agent. Suggest 5-7 diverse countries for a traveler with \
         the following preferences:\n\
         - Budget: {budget}\n\
         - Time of year: {season}\n\
         - Continent: {continent}\n\n\
         For each country provide its name, a short compelling description (2-3 sentences), \
         a visa requirement summary (mention e-visa or visa-on-arrival availability), an \
         estimated average cost in USD for a solo 7-day trip, a cost breakdown \
         (accommodation, food, activities) in USD, and currency information (3-letter code, \
         symbol, conversion rates from 1 USD to the local currency and to the traveler's \
         home currency).\n\
         Return the data as an array in the specified JSON format. Ensure all fields are filled."
    )
}

/// Curated off-the-beaten-path destination suggestions.
pub fn off_beat_suggestions() -> String {
    "You are a seasoned traveler who loves finding hidden gems. Suggest 5-7 unique, \
     off-the-beaten-path countries for adventurous travelers. Avoid overly common tourist \
     destinations.\n\n\
     For each country provide its name, a short description highlighting its unique appeal \
     (2-3 sentences), a visa requirement summary (mention e-visa or visa-on-arrival \
     availability), an estimated average cost in USD for a solo 7-day trip, a cost breakdown \
     (accommodation, food, activities) in USD, and currency information (3-letter code, \
     symbol, conversion rates from 1 USD to the local currency and to the traveler's home \
     currency).\n\
     Return the data as an array in the specified JSON format. Ensure all fields are filled."
        .to_string()
}

/// Direct lookup of a single named country.
pub fn country_brief(country: &str) -> String {
    format!(
        "You are an expert travel agent. For the country \"{country}\", provide:\n\
         1. A short, compelling description of why it is a good travel destination (2-3 sentences).\n\
         2. A summary of visa requirements, mentioning e-visa or visa-on-arrival availability.\n\
         3. An estimated average cost in USD for a solo traveler for a 7-day trip.\n\
         4. A cost breakdown (accommodation, food, activities) for that trip, in USD.\n\
         5. Currency information: the 3-letter code, the symbol, and conversion rates from \
         1 USD to the local currency and to the traveler's home currency.\n\
         Return the data in the specified JSON format."
    )
}

/// Fixed-duration plan generation.
pub fn full_plan(destination: &str, duration: u32, style: ItineraryStyle, notes: &str) -> String {
    let notes = if notes.trim().is_empty() { "None" } else { notes };
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(&format!(
        "Create a detailed {duration}-day travel itinerary for {destination}.\n\
         Traveler preferences:\n- Style: {style}\n- Notes: {notes}\n\n\
         The plan should include:\n\
         1. A day-by-day itinerary. For each day provide a brief general weather line for \
         the city given the time of year.\n"
    ));
    prompt.push_str(ACTIVITY_RULES);
    prompt.push_str("2. ");
    prompt.push_str(TRAVEL_RULES);
    prompt.push_str(
        "3. For each day, 2-3 advisory tips (dos, don'ts, warnings, info).\n\
         4. A list of official links (tourism board, visa portal).\n\
         5. Estimated accommodation costs per city, with nights and total, in USD.\n\
         6. A concise optimization note on how to best execute the plan.\n\n\
         Return a single JSON object matching the provided schema.",
    );
    prompt
}

/// Comprehensive full-country tour; the oracle picks the duration.
pub fn comprehensive_plan(destination: &str, style: ItineraryStyle, notes: &str) -> String {
    let notes = if notes.trim().is_empty() { "None" } else { notes };
    let mut prompt = String::with_capacity(1024);
    prompt.push_str(&format!(
        "Create a comprehensive, full-country tour itinerary for {destination}. You decide \
         the optimal duration (between 7 and 14 days) to cover the main highlights without \
         rushing.\n\
         Traveler preferences:\n- Style: {style}\n- Notes: {notes}\n\n\
         The plan must include:\n\
         1. An optimal duration decided by you.\n\
         2. A day-by-day itinerary with a brief general weather line per day.\n"
    ));
    prompt.push_str(ACTIVITY_RULES);
    prompt.push_str("3. ");
    prompt.push_str(TRAVEL_RULES);
    prompt.push_str(
        "4. Daily advisory tips.\n\
         5. Official links.\n\
         6. Accommodation costs per city in USD.\n\
         7. A concise optimization note.\n\n\
         Return a single JSON object matching the provided schema.",
    );
    prompt
}

/// Refinement of an existing plan.
///
/// `instruction` is the compiled text from [`crate::refine::compile`];
/// `exclusions` are deletion fingerprints already rendered human-readable
/// (`"<name> in <city>"`).
pub fn refine_plan(
    destination: &str,
    duration: usize,
    style: ItineraryStyle,
    current_days: &[DayPlan],
    instruction: &str,
    exclusions: &[String],
) -> String {
    let current = serde_json::to_string_pretty(current_days)
        .unwrap_or_else(|_| "[]".to_string());

    let mut prompt = String::with_capacity(current.len() + instruction.len() + 1024);
    prompt.push_str(&format!(
        "You are a travel agent refining an existing plan.\n\
         Destination: {destination}\n\
         Duration: {duration} days\n\
         Style: {style}\n\n\
         Here is the current plan that the user wants to modify:\n{current}\n\n\
         Here are the user's refinement notes:\n\"{instruction}\"\n"
    ));

    if !exclusions.is_empty() {
        prompt.push_str(
            "\nIMPORTANT EXCLUSION LIST:\n\
             The user has previously deleted the following activities. You MUST NOT include \
             these specific activities, or any very similar ones, in the new plan under any \
             circumstances:\n",
        );
        for exclusion in exclusions {
            prompt.push_str(&format!("- {exclusion}\n"));
        }
        prompt.push_str(
            "\nIf you cannot find enough new, unique activities after respecting this \
             exclusion list, you MUST say so clearly in the optimization note, for example: \
             \"I have included all available relevant activities and there are no more \
             unique suggestions for this destination based on your criteria.\"\n",
        );
    }

    prompt.push_str(
        "\nModify the plan based on the notes. You may add, remove, or reorder activities, \
         or change cities if requested. Any new activity needs every field from the schema, \
         including a concise visiting tip and up to 3 non-Wikipedia reference links. Keep \
         the plan coherent and within the duration. Each day keeps a general weather line.\n\
         CRITICAL: preserve each day's user_note field. When you modify a day, carry its \
         existing user_note over unchanged unless the notes explicitly ask to change it. ",
    );
    prompt.push_str(TRAVEL_RULES);
    prompt.push_str(
        "\nReturn the complete, updated travel plan as a single JSON object matching the \
         provided schema, including days, optimization_note, official_links, and \
         city_stay_costs.",
    );
    prompt
}

/// Packing list for a planned trip.
pub fn packing_list(destination: &str, duration: usize, activity_names: &[String]) -> String {
    format!(
        "Create a detailed packing list for a {duration}-day trip to {destination}.\n\
         The traveler will be doing the following activities: {}.\n\
         Group the items into logical categories (e.g. 'Clothing', 'Toiletries', \
         'Documents', 'Electronics', 'Miscellaneous'). Be specific and practical.\n\n\
         Return the packing list as an array of categories in the specified JSON format.",
        activity_names.join(", ")
    )
}
