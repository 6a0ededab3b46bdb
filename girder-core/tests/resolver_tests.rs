use girder_core::{Error, Namespace, RoutingTarget, UriResolver};
use std::collections::HashMap;

fn resolver() -> UriResolver {
    UriResolver::new("Home", ["main"])
}

fn resolve(target: &str) -> (RoutingTarget, HashMap<String, String>) {
    let mut query = HashMap::new();
    let routing = resolver().resolve(target, &mut query).unwrap();
    (routing, query)
}

fn components(routing: &RoutingTarget) -> Vec<&str> {
    routing.path_components.iter().map(String::as_str).collect()
}

#[test]
fn test_root_path() {
    let (routing, query) = resolve("/");
    assert_eq!(routing.controller_name, "Home");
    assert_eq!(routing.namespace, Namespace::App);
    assert!(routing.path_components.is_empty());
    assert_eq!(routing.original_path, "/");
    assert!(query.is_empty());
}

#[test]
fn test_specific_controller() {
    let (routing, _) = resolve("/Blog");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(routing.namespace, Namespace::App);
    assert!(routing.path_components.is_empty());
    assert_eq!(routing.original_path, "/Blog");
}

#[test]
fn test_controller_and_method() {
    let (routing, _) = resolve("/Blog/show");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(components(&routing), ["show"]);
    assert_eq!(routing.original_path, "/Blog/show");
}

#[test]
fn test_method_of_default_controller() {
    let (routing, _) = resolve("/main");
    assert_eq!(routing.controller_name, "Home");
    assert_eq!(routing.namespace, Namespace::App);
    assert_eq!(components(&routing), ["main"]);
    assert_eq!(routing.original_path, "/main");
}

#[test]
fn test_default_method_match_ignores_case() {
    let (routing, _) = resolve("/MAIN/extra");
    assert_eq!(routing.controller_name, "Home");
    assert_eq!(components(&routing), ["MAIN", "extra"]);
}

#[test]
fn test_api_controller() {
    let (routing, _) = resolve("/api/Users");
    assert_eq!(routing.controller_name, "Users");
    assert_eq!(routing.namespace, Namespace::Api);
    assert!(routing.path_components.is_empty());
    assert_eq!(routing.original_path, "/api/Users");
}

#[test]
fn test_api_controller_and_method() {
    let (routing, _) = resolve("/api/Users/show/1");
    assert_eq!(routing.controller_name, "Users");
    assert_eq!(routing.namespace, Namespace::Api);
    assert_eq!(components(&routing), ["show", "1"]);
    assert_eq!(routing.original_path, "/api/Users/show/1");
}

#[test]
fn test_multiple_parameters() {
    let (routing, _) = resolve("/Blog/show/123/comments/456");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(components(&routing), ["show", "123", "comments", "456"]);
    assert_eq!(routing.original_path, "/Blog/show/123/comments/456");
}

#[test]
fn test_index_php_prefix() {
    let (routing, _) = resolve("/index.php/Blog/show");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(components(&routing), ["show"]);
    assert_eq!(routing.original_path, "/Blog/show");
}

#[test]
fn test_index_php_suffix() {
    let (routing, _) = resolve("/Blog/index.php");
    assert_eq!(routing.controller_name, "Blog");
    assert!(routing.path_components.is_empty());
    assert_eq!(routing.original_path, "/Blog");
}

#[test]
fn test_index_php_anywhere_with_api() {
    for target in [
        "/index.php/api/Users/show",
        "/api/index.php/Users/show",
        "/api/Users/index.php/show",
        "/index.php/api/Users/show/index.php",
    ] {
        let (routing, _) = resolve(target);
        assert_eq!(routing.namespace, Namespace::Api, "{}", target);
        assert_eq!(routing.controller_name, "Users", "{}", target);
        assert_eq!(components(&routing), ["show"], "{}", target);
    }
}

#[test]
fn test_index_php_alone_is_root() {
    let (routing, _) = resolve("/index.php");
    assert_eq!(routing.controller_name, "Home");
    assert_eq!(routing.original_path, "/");
}

#[test]
fn test_trailing_slash() {
    let (routing, _) = resolve("/Blog/show/");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(components(&routing), ["show"]);
    assert_eq!(routing.original_path, "/Blog/show/");
}

#[test]
fn test_query_string() {
    let (routing, query) = resolve("/Blog/show?id=123&category=tech");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(components(&routing), ["show"]);
    assert_eq!(routing.original_path, "/Blog/show");
    assert_eq!(query["id"], "123");
    assert_eq!(query["category"], "tech");
}

#[test]
fn test_complex_query_string() {
    let (routing, query) = resolve("/api/Posts?limit=10&offset=20&sort=date&order=desc");
    assert_eq!(routing.controller_name, "Posts");
    assert_eq!(routing.namespace, Namespace::Api);
    assert!(routing.path_components.is_empty());
    assert_eq!(routing.original_path, "/api/Posts");
    assert_eq!(query["limit"], "10");
    assert_eq!(query["offset"], "20");
    assert_eq!(query["sort"], "date");
    assert_eq!(query["order"], "desc");
}

#[test]
fn test_only_query_string() {
    let (routing, query) = resolve("/?search=test&page=1");
    assert_eq!(routing.controller_name, "Home");
    assert!(routing.path_components.is_empty());
    assert_eq!(routing.original_path, "/");
    assert_eq!(query["search"], "test");
    assert_eq!(query["page"], "1");
}

#[test]
fn test_encoded_query_values() {
    let (routing, query) = resolve("/Blog/search?q=hello%20world&tags=php%2Cweb&name=a+b");
    assert_eq!(components(&routing), ["search"]);
    assert_eq!(routing.original_path, "/Blog/search");
    assert_eq!(query["q"], "hello world");
    assert_eq!(query["tags"], "php,web");
    assert_eq!(query["name"], "a b");
}

#[test]
fn test_repeated_query_key_last_wins() {
    let (_, query) = resolve("/Blog?page=1&page=2");
    assert_eq!(query["page"], "2");
}

#[test]
fn test_api_without_controller_is_invalid() {
    let mut query = HashMap::new();
    let result = resolver().resolve("/api?x=1", &mut query);

    assert!(matches!(result, Err(Error::InvalidRoute(_))));
    // The query string is still decoded.
    assert_eq!(query["x"], "1");
}

#[test]
fn test_api_trailing_slash_without_controller_is_invalid() {
    let mut query = HashMap::new();
    assert!(matches!(
        resolver().resolve("/api/", &mut query),
        Err(Error::InvalidRoute(_))
    ));
}

#[test]
fn test_url_in_query_value() {
    let (routing, query) = resolve("/api/sample/search?q=http://example.com/x");
    assert_eq!(routing.namespace, Namespace::Api);
    assert_eq!(routing.controller_name, "sample");
    assert_eq!(components(&routing), ["search"]);
    assert_eq!(routing.original_path, "/api/sample/search");
    assert_eq!(query["q"], "http://example.com/x");

    let (routing, query) = resolve("/Blog/show?next=a://b/c");
    assert_eq!(routing.controller_name, "Blog");
    assert_eq!(components(&routing), ["show"]);
    assert_eq!(query["next"], "a://b/c");
}

#[test]
fn test_absolute_form_target() {
    let (routing, query) = resolve("http://localhost:8080/api/sample?q=x://y");
    assert_eq!(routing.namespace, Namespace::Api);
    assert_eq!(routing.controller_name, "sample");
    assert_eq!(query["q"], "x://y");
}
