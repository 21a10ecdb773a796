//! Pretty output formatting.

use chronica_core::content::{Category, Event, Person, Resource, User};

/// Format a category for display.
pub fn format_category(category: &Category) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}",
        category.name, category.slug, category.id
    );
    if let Some(desc) = &category.description {
        output.push_str(&format!("\n  Description: {}", desc));
    }
    if let Some(url) = &category.image_url {
        output.push_str(&format!("\n  Image: {}", url));
    }
    output
}

/// Format categories for display.
pub fn format_categories(categories: &[Category]) -> String {
    if categories.is_empty() {
        return "No categories found.".to_string();
    }
    let mut output = format!("CATEGORIES ({})\n", categories.len());
    output.push_str(&"-".repeat(40));
    for category in categories {
        output.push_str(&format!("\n{}", format_category(category)));
        output.push('\n');
    }
    output
}

/// Format an event for display.
pub fn format_event(event: &Event) -> String {
    let mut output = format!(
        "{} [{}]\n  ID: {}\n  Date: {}",
        event.title, event.slug, event.id, event.start_date
    );
    if let Some(end) = event.end_date {
        output.push_str(&format!(" to {}", end));
    }
    output.push_str(&format!("\n  Importance: {}", event.important));
    if let Some(source) = &event.source {
        output.push_str(&format!("\n  Source: {}", source));
    }
    if let Some(url) = &event.image_url {
        output.push_str(&format!("\n  Image: {}", url));
    }
    output
}

/// Format events for display.
pub fn format_events(events: &[Event]) -> String {
    if events.is_empty() {
        return "No events found.".to_string();
    }
    let mut output = format!("EVENTS ({})\n", events.len());
    output.push_str(&"-".repeat(40));
    for event in events {
        output.push_str(&format!("\n{}", format_event(event)));
        output.push('\n');
    }
    output
}

/// Format a person for display.
pub fn format_person(person: &Person) -> String {
    let mut output = format!("{} [{}]\n  ID: {}", person.name, person.slug, person.id);
    if let Some(born) = person.birth_date {
        output.push_str(&format!("\n  Born: {}", born));
    }
    if let Some(died) = person.death_date {
        output.push_str(&format!("\n  Died: {}", died));
    }
    if let Some(profession) = &person.profession {
        output.push_str(&format!("\n  Profession: {}", profession));
    }
    output
}

/// Format people for display.
pub fn format_people(people: &[Person]) -> String {
    if people.is_empty() {
        return "No people found.".to_string();
    }
    let mut output = format!("PEOPLE ({})\n", people.len());
    output.push_str(&"-".repeat(40));
    for person in people {
        output.push_str(&format!("\n{}", format_person(person)));
        output.push('\n');
    }
    output
}

/// Format a resource for display.
pub fn format_resource(resource: &Resource) -> String {
    let mut output = format!(
        "Resource {} [{}]\n  Event: {}",
        resource.id, resource.media_type, resource.event_id
    );
    if let Some(url) = &resource.url {
        output.push_str(&format!("\n  URL: {}", url));
    }
    if let Some(source) = &resource.source {
        output.push_str(&format!("\n  Source: {}", source));
    }
    output
}

/// Format resources for display.
pub fn format_resources(resources: &[Resource]) -> String {
    if resources.is_empty() {
        return "No resources found.".to_string();
    }
    let mut output = format!("RESOURCES ({})\n", resources.len());
    output.push_str(&"-".repeat(40));
    for resource in resources {
        output.push_str(&format!("\n{}", format_resource(resource)));
        output.push('\n');
    }
    output
}

/// Format a user for display.
pub fn format_user(user: &User) -> String {
    format!(
        "{} (@{})\n  ID: {}\n  Email: {}\n  Role: {:?}",
        user.fullname, user.username, user.id, user.email, user.role
    )
}

/// Format users for display.
pub fn format_users(users: &[User]) -> String {
    if users.is_empty() {
        return "No users found.".to_string();
    }
    let mut output = format!("USERS ({})\n", users.len());
    output.push_str(&"-".repeat(40));
    for user in users {
        output.push_str(&format!("\n{}", format_user(user)));
        output.push('\n');
    }
    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_collections_say_so() {
        assert_eq!(format_categories(&[]), "No categories found.");
        assert_eq!(format_events(&[]), "No events found.");
        assert_eq!(format_users(&[]), "No users found.");
    }
}
