use serde_json::{json, Value};

pub fn get_repository_json(owner: &str, name: &str, clone_url: &str) -> Value {
    json!({
        "id": 1296269,
        "name": name,
        "full_name": format!("{}/{}", owner, name),
        "private": true,
        "clone_url": clone_url,
        "html_url": format!("https://github.com/{}/{}", owner, name),
    })
}

pub fn get_user_json(login: &str) -> Value {
    json!({
        "login": login,
        "id": 1,
        "type": "User",
    })
}

pub fn get_error_json(message: &str, errors: Value) -> Value {
    json!({
        "message": message,
        "errors": errors,
        "documentation_url": "https://docs.github.com/rest",
    })
}

pub fn get_already_exists_json() -> Value {
    get_error_json(
        "Repository creation failed.",
        json!([{
            "resource": "Repository",
            "code": "custom",
            "field": "name",
            "message": "name already exists on this account"
        }]),
    )
}

pub fn get_gitlab_release_json(tag_name: &str, name: Option<&str>, description: &str) -> Value {
    json!({
        "tag_name": tag_name,
        "name": name,
        "description": description,
        "created_at": "2024-01-08T10:15:00.000Z",
    })
}
