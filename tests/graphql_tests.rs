mod common;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use serde_json::{json, Value};

async fn execute(router: &axum::Router, query: &str, authorization: Option<String>) -> Value {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/graphql")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(authorization) = authorization {
        builder = builder.header(header::AUTHORIZATION, authorization);
    }
    let request = builder
        .body(Body::from(json!({ "query": query }).to_string()))
        .unwrap();

    let response = common::send(router, request).await;
    assert_eq!(response.status(), StatusCode::OK);
    common::body_json(response).await
}

fn first_error(body: &Value) -> &Value {
    &body["errors"][0]
}

#[tokio::test]
async fn test_query_patient() {
    let (state, router) = common::setup_app().await;
    let id = common::seed(&state, common::new_patient("A123456789", "Alpha")).await;

    let query = format!(
        r#"{{ patient(id: "{}") {{ version versichertennummer versicherungsart geburtsdatum intensiv name {{ nachname vorname }} }} }}"#,
        id
    );
    let body = execute(&router, &query, None).await;

    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(
        body["data"]["patient"],
        json!({
            "version": 0,
            "versichertennummer": "A123456789",
            "versicherungsart": "GESETZLICH",
            "geburtsdatum": "1980-05-17",
            "intensiv": false,
            "name": { "nachname": "Alpha", "vorname": "Vorname" }
        })
    );
}

#[tokio::test]
async fn test_patient_has_no_id_field() {
    let (state, router) = common::setup_app().await;
    let id = common::seed(&state, common::new_patient("A123456789", "Alpha")).await;

    let query = format!(r#"{{ patient(id: "{}") {{ id }} }}"#, id);
    let body = execute(&router, &query, None).await;

    assert!(body["errors"].as_array().is_some_and(|errors| !errors.is_empty()));
}

#[tokio::test]
async fn test_query_patient_not_found() {
    let (_state, router) = common::setup_app().await;

    let body = execute(&router, r#"{ patient(id: "999999") { versichertennummer } }"#, None).await;

    assert_eq!(body["data"]["patient"], Value::Null);
    let error = first_error(&body);
    assert_eq!(error["message"], "Es wurde kein Patient mit der ID 999999 gefunden.");
    assert_eq!(error["extensions"]["code"], "BAD_USER_INPUT");
    assert_eq!(body["errors"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn test_query_patienten() {
    let (state, router) = common::setup_app().await;
    common::seed(&state, common::new_patient("A000000001", "Alpha")).await;
    common::seed(&state, common::new_patient("A000000002", "Beta")).await;

    let body = execute(&router, r#"{ patienten(nachname: "a") { name { nachname } } }"#, None).await;
    assert_eq!(body["data"]["patienten"].as_array().map(Vec::len), Some(2));

    let body = execute(&router, r#"{ patienten(nachname: "Bet") { name { nachname } } }"#, None).await;
    assert_eq!(
        body["data"]["patienten"],
        json!([{ "name": { "nachname": "Beta" } }])
    );

    let body = execute(&router, "{ patienten { versichertennummer } }", None).await;
    assert_eq!(body["data"]["patienten"].as_array().map(Vec::len), Some(2));
}

#[tokio::test]
async fn test_query_patienten_not_found() {
    let (state, router) = common::setup_app().await;
    common::seed(&state, common::new_patient("A000000001", "Alpha")).await;

    let body = execute(&router, r#"{ patienten(nachname: "abc") { versichertennummer } }"#, None).await;

    assert_eq!(body["data"]["patienten"], Value::Null);
    let error = first_error(&body);
    assert_eq!(error["message"], "Es wurden keine Patienten gefunden.");
    assert_eq!(error["extensions"]["code"], "BAD_USER_INPUT");
}

const CREATE: &str = r#"
    mutation {
        create(input: {
            versichertennummer: "A123456700",
            versicherungsart: PRIVAT,
            geburtsdatum: "2022-02-28",
            intensiv: true,
            name: { nachname: "X", vorname: "Y" },
            operationen: [{ eingriff: "Gips", behandlungsraum: 1 }]
        })
    }
"#;

#[tokio::test]
async fn test_create() {
    let (state, router) = common::setup_app().await;

    let body = execute(&router, CREATE, Some(common::bearer(&["arzt"]))).await;

    assert!(body.get("errors").is_none(), "{}", body);
    let id = body["data"]["create"].as_str().unwrap();
    assert!(!id.starts_with('0') && id.chars().all(|c| c.is_ascii_digit()));

    let patienten = state.read_service.find(None).await.unwrap();
    assert_eq!(patienten.len(), 1);
    assert_eq!(patienten[0].id.to_string(), id);
}

#[tokio::test]
async fn test_create_duplicate() {
    let (_state, router) = common::setup_app().await;
    let token = common::bearer(&["rezeptionist"]);

    execute(&router, CREATE, Some(token.clone())).await;
    let body = execute(&router, CREATE, Some(token)).await;

    assert_eq!(body["data"]["create"], Value::Null);
    let error = first_error(&body);
    assert_eq!(error["message"], "Die Versichertennummer A123456700 existiert bereits");
    assert_eq!(error["extensions"]["code"], "BAD_USER_INPUT");
    assert_eq!(
        error["extensions"]["messages"],
        json!(["Die Versichertennummer A123456700 existiert bereits"])
    );
}

#[tokio::test]
async fn test_create_invalid_input() {
    let (_state, router) = common::setup_app().await;

    let mutation = r#"
        mutation {
            create(input: {
                versichertennummer: "12",
                intensiv: true,
                name: { nachname: "X", vorname: "Y" },
                operationen: [{ eingriff: "", behandlungsraum: -1 }]
            })
        }
    "#;
    let body = execute(&router, mutation, Some(common::bearer(&["arzt"]))).await;

    let error = first_error(&body);
    assert_eq!(error["extensions"]["code"], "BAD_USER_INPUT");
    let messages = error["extensions"]["messages"].as_array().unwrap();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].as_str().unwrap().starts_with("versichertennummer "));
    assert!(messages[1].as_str().unwrap().starts_with("operationen[0].eingriff "));
    assert!(messages[2].as_str().unwrap().starts_with("operationen[0].behandlungsraum "));
}

#[tokio::test]
async fn test_create_forbidden() {
    let (state, router) = common::setup_app().await;

    for authorization in [None, Some(common::bearer(&["patient"]))] {
        let body = execute(&router, CREATE, authorization).await;
        assert_eq!(body["data"]["create"], Value::Null);
        assert_eq!(first_error(&body)["extensions"]["code"], "FORBIDDEN");
    }
    assert!(state.read_service.find(None).await.unwrap().is_empty());
}

fn update_mutation(id: &str, version: i64) -> String {
    format!(
        r#"mutation {{ update(input: {{ id: "{}", version: {}, versichertennummer: "A123456789", intensiv: true, diagnose: "Grippe" }}) }}"#,
        id, version
    )
}

#[tokio::test]
async fn test_update() {
    let (state, router) = common::setup_app().await;
    let id = common::seed(&state, common::new_patient("A123456789", "Alpha")).await;
    let token = common::bearer(&["arzt"]);

    let body = execute(&router, &update_mutation(&id.to_string(), 0), Some(token.clone())).await;
    assert!(body.get("errors").is_none(), "{}", body);
    assert_eq!(body["data"]["update"], 1);

    let body = execute(&router, &update_mutation(&id.to_string(), 0), Some(token)).await;
    let error = first_error(&body);
    assert_eq!(error["message"], "Die Versionsnummer \"0\" ist nicht mehr aktuell");
    assert_eq!(error["extensions"]["code"], "BAD_USER_INPUT");
}

#[tokio::test]
async fn test_update_errors() {
    let (state, router) = common::setup_app().await;
    let id = common::seed(&state, common::new_patient("A123456789", "Alpha")).await;
    let token = common::bearer(&["arzt"]);

    let body = execute(&router, &update_mutation("999999", 0), Some(token.clone())).await;
    assert_eq!(
        first_error(&body)["message"],
        "Es gibt keinen Patienten mit der ID 999999"
    );

    let body = execute(&router, &update_mutation(&id.to_string(), -1), Some(token.clone())).await;
    assert_eq!(
        first_error(&body)["message"],
        "\"-1\" ist keine gueltige Versionsnummer"
    );

    let body = execute(&router, &update_mutation(&id.to_string(), 0), None).await;
    assert_eq!(first_error(&body)["extensions"]["code"], "FORBIDDEN");
}

#[tokio::test]
async fn test_graphiql_page() {
    let (_state, router) = common::setup_app().await;

    let request = Request::builder()
        .uri("/graphql")
        .body(Body::empty())
        .unwrap();
    let response = common::send(&router, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(common::body_string(response).await.contains("graphiql"));
}
