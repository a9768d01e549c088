//! Prompt assembly for plant profiles
//!
//! The section list below is what the model is asked for. Ingestion never
//! relies on it: responses may skip, add or reorder sections.

/// Sections requested from the model, in order.
pub const PROFILE_SECTIONS: [&str; 34] = [
    "Common Name",
    "Botanical Name",
    "Family",
    "Plant Type",
    "Mature Size",
    "Sun Exposure",
    "Soil Type",
    "Soil pH",
    "Bloom Time",
    "Flower Color",
    "Hardiness Zones",
    "Native Area",
    "Planting",
    "Light",
    "Soil Preparation",
    "Watering",
    "Temperature and Humidity",
    "Fertilizer",
    "Types/Varieties",
    "Pruning",
    "Propagation",
    "Growing from Seed",
    "Potting and Repotting",
    "Pests and Diseases",
    "Encouraging Blooms",
    "Common Problems",
    "Growth Rate",
    "Watering Frequency",
    "Pollinator-Friendly",
    "Toxicity",
    "Companion Plants",
    "Cultural Significance",
    "Eco-Friendliness",
    "Indoor vs. Outdoor Suitability",
];

/// Build the single user-role prompt for `plant_name`.
pub fn build_prompt(plant_name: &str) -> String {
    format!(
        r#"You are a botanist specializing in India-specific flower cultivation. Provide full, detailed, structured information about [{name}].
Each section must contain a **detailed paragraph**.
Output must be formatted as **key: detailed paragraph explanation**.

**Sections:**
{sections}.

**Example Output Format:**
"Common Name": "Rose - The rose is one of the most beloved flowers, known for its fragrance..."
"Botanical Name": "Rosa rubiginosa - This species belongs to the Rosaceae family..."

- Ensure all responses are India-specific.
- Do not skip any section.
- Ensure detailed paragraph descriptions for each section.
"#,
        name = plant_name,
        sections = PROFILE_SECTIONS.join(", "),
    )
}
