use crate::domain::model::{ItemTotal, RestaurantProfile, SalesDigest};
use serde_json::{json, Value};

/// Plain-text rendering of a digest, one field per line.
pub fn digest_context(digest: &SalesDigest) -> String {
    format!(
        "- Top sellers: {}\n- Bottom sellers: {}\n- Total units sold: {}\n- Peak time slot: {}",
        item_list(&digest.top_sellers),
        item_list(&digest.bottom_sellers),
        digest.total_units_sold,
        digest.peak_time_slot
    )
}

fn item_list(items: &[ItemTotal]) -> String {
    if items.is_empty() {
        return "none recorded".to_string();
    }
    items
        .iter()
        .map(|item| format!("{} ({} units)", item.item_name, item.total_quantity))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Shape the hosted model is asked to answer in, so replies never need delimiter splitting.
pub fn response_schema() -> Value {
    let section = |description: &str| {
        json!({
            "type": "array",
            "description": description,
            "items": { "type": "string" }
        })
    };

    json!({
        "type": "object",
        "required": ["star_performers", "dead_weight", "peak_times", "financial_health"],
        "properties": {
            "star_performers": section("Items driving volume, citing menu names"),
            "dead_weight": section("Items to cut, rework or promote"),
            "peak_times": section("Staffing and prep observations for busy slots"),
            "financial_health": section("Overall verdict on the sales mix"),
        }
    })
}

/// Health-check instruction for the hosted model, grounded on the digest.
pub fn internal_audit_prompt(profile: &RestaurantProfile, digest: &SalesDigest) -> String {
    let name = if profile.name.trim().is_empty() {
        "the restaurant"
    } else {
        profile.name.trim()
    };

    let mut prompt = format!("ROLE: Data Analyst for {}.\n", name);

    let location: Vec<&str> = [profile.address.as_str(), profile.neighborhood.as_str()]
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect();
    if !location.is_empty() {
        prompt.push_str(&format!("LOCATION: {}\n", location.join(", ")));
    }
    if !profile.cuisine.trim().is_empty() {
        prompt.push_str(&format!("CUISINE: {}\n", profile.cuisine.trim()));
    }
    if !profile.menu_items.trim().is_empty() {
        prompt.push_str(&format!("MENU:\n{}\n", profile.menu_items.trim()));
    }

    prompt.push_str("SALES DIGEST:\n");
    prompt.push_str(&digest_context(digest));
    prompt.push('\n');
    prompt.push_str(
        "TASK: Health Check. 1. Star Performers, 2. Dead Weight, 3. Peak Times, 4. Financial Health.\n",
    );
    prompt.push_str("Cite specific menu items. Answer only with JSON matching this schema:\n");
    // to_string_pretty cannot fail on a Value built from json!.
    prompt.push_str(&serde_json::to_string_pretty(&response_schema()).unwrap_or_default());
    prompt.push('\n');
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::PeakTimeSlot;

    fn digest() -> SalesDigest {
        SalesDigest {
            top_sellers: vec![ItemTotal::new("Tacos", 15), ItemTotal::new("Quesadilla", 7)],
            bottom_sellers: vec![ItemTotal::new("Quesadilla", 7), ItemTotal::new("Tacos", 15)],
            total_units_sold: 22,
            peak_time_slot: PeakTimeSlot::Slot("19:00".to_string()),
        }
    }

    #[test]
    fn test_digest_context_lines() {
        let text = digest_context(&digest());
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "- Top sellers: Tacos (15 units), Quesadilla (7 units)");
        assert_eq!(lines[2], "- Total units sold: 22");
        assert_eq!(lines[3], "- Peak time slot: 19:00");
    }

    #[test]
    fn test_empty_digest_context() {
        let empty = SalesDigest {
            top_sellers: vec![],
            bottom_sellers: vec![],
            total_units_sold: 0,
            peak_time_slot: PeakTimeSlot::NotAvailable,
        };
        let text = digest_context(&empty);
        assert!(text.contains("Top sellers: none recorded"));
        assert!(text.contains("Peak time slot: not available"));
    }

    #[test]
    fn test_internal_audit_prompt_embeds_profile_and_schema() {
        let profile = RestaurantProfile {
            name: "Pikio Taco".to_string(),
            address: "Carrer de Còrsega, 376".to_string(),
            menu_items: "TACOS (3.90€/unit): Carnitas, Birria".to_string(),
            ..RestaurantProfile::default()
        };
        let prompt = internal_audit_prompt(&profile, &digest());

        assert!(prompt.starts_with("ROLE: Data Analyst for Pikio Taco."));
        assert!(prompt.contains("LOCATION: Carrer de Còrsega, 376"));
        assert!(prompt.contains("MENU:\nTACOS"));
        assert!(prompt.contains("- Top sellers: Tacos (15 units)"));
        assert!(prompt.contains("\"star_performers\""));
        assert!(!prompt.contains("CUISINE"));
    }

    #[test]
    fn test_prompt_without_profile_name() {
        let prompt = internal_audit_prompt(&RestaurantProfile::default(), &digest());
        assert!(prompt.starts_with("ROLE: Data Analyst for the restaurant."));
        assert!(!prompt.contains("MENU:"));
    }

    #[test]
    fn test_response_schema_lists_required_sections() {
        let schema = response_schema();
        let required = schema["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        assert!(schema["properties"]["dead_weight"]["items"]["type"] == "string");
    }
}
