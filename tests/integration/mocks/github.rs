use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, ResponseTemplate};

pub fn create_repository_mock(
    org: Option<&str>,
    status: u16,
    response: serde_json::Value,
) -> Mock {
    let route = match org {
        Some(org) => format!("/orgs/{org}/repos", org = org),
        None => "/user/repos".to_string(),
    };

    Mock::given(method("POST"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(status).set_body_json(response))
        .expect(1)
}

pub fn get_repository_mock(owner: &str, repo: &str, response: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path(format!(
            "/repos/{owner}/{repo}",
            owner = owner,
            repo = repo
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(response))
        .expect(1)
}

pub fn get_user_mock(status: u16, response: serde_json::Value) -> Mock {
    Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(status).set_body_json(response))
        .expect(1)
}

pub fn create_release_mock(owner: &str, repo: &str, body: serde_json::Value) -> Mock {
    Mock::given(method("POST"))
        .and(path(format!(
            "/repos/{owner}/{repo}/releases",
            owner = owner,
            repo = repo
        )))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(201).set_body_json(serde_json::json!({ "id": 1 })))
        .expect(1)
}

pub fn update_settings_mock(owner: &str, repo: &str, body: serde_json::Value) -> Mock {
    Mock::given(method("PATCH"))
        .and(path(format!(
            "/repos/{owner}/{repo}",
            owner = owner,
            repo = repo
        )))
        .and(body_json(body))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .expect(1)
}

pub fn team_access_mock(org: &str, team: &str, repo: &str) -> Mock {
    Mock::given(method("PUT"))
        .and(path(format!(
            "/orgs/{org}/teams/{team}/repos/{org}/{repo}",
            org = org,
            team = team,
            repo = repo
        )))
        .and(body_json(serde_json::json!({ "permission": "push" })))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
}

pub fn create_repository_with_body_mock(
    org: Option<&str>,
    request: serde_json::Value,
    response: serde_json::Value,
) -> Mock {
    let route = match org {
        Some(org) => format!("/orgs/{org}/repos", org = org),
        None => "/user/repos".to_string(),
    };

    Mock::given(method("POST"))
        .and(path(route))
        .and(body_json(request))
        .respond_with(ResponseTemplate::new(201).set_body_json(response))
        .expect(1)
}
