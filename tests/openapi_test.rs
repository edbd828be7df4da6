use elepy::routes::ApiDoc;
use utoipa::OpenApi;

#[test]
fn test_list_endpoint_is_documented() {
    let doc = ApiDoc::openapi();
    let path = doc.paths.paths.get("/{model}").expect("list path missing");
    let operation = path.get.as_ref().expect("GET operation missing");

    let parameters: Vec<&str> = operation
        .parameters
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    for expected in ["model", "q", "sort", "pageSize", "pageNumber"] {
        assert!(parameters.contains(&expected), "missing parameter {expected}: {parameters:?}");
    }

    for status in ["200", "400", "404"] {
        assert!(operation.responses.responses.contains_key(status), "missing {status} response");
    }
}

#[test]
fn test_lookup_endpoint_is_documented() {
    let doc = ApiDoc::openapi();
    let path = doc.paths.paths.get("/{model}/{id}").expect("lookup path missing");
    let operation = path.get.as_ref().expect("GET operation missing");

    let parameters: Vec<&str> = operation
        .parameters
        .as_ref()
        .unwrap()
        .iter()
        .map(|p| p.name.as_str())
        .collect();
    assert_eq!(parameters, vec!["model", "id"]);

    for status in ["200", "400", "404"] {
        assert!(operation.responses.responses.contains_key(status), "missing {status} response");
    }
}
