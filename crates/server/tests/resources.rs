mod support;

use axum::http::StatusCode;
use serde_json::json;

use support::spawn_app;

#[tokio::test]
async fn service_round_trip_and_search() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("root@example.com", "admin").await?;
    let id = app.catalog_entry(&admin, "Oil Change", "49.99").await?;
    app.catalog_entry(&admin, "Brake Inspection", "25.00").await?;

    let (status, body) = app.json("GET", &format!("/services/{id}"), None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Oil Change");
    assert_eq!(body["price"], "49.99");
    assert_eq!(body["duration"], 60);

    let (status, body) = app.json("GET", "/services/search?name=oil&max_price=50", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(1));

    let (status, _) = app.json("GET", "/services/search?min_price=100&max_price=10", None, None).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app.json("GET", "/services/", None, None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body.as_array().map(Vec::len), Some(2));
    let (_, body) = app.json("GET", "/services?page=1&per_page=1", None, None).await?;
    assert_eq!(body.as_array().map(Vec::len), Some(1));
    Ok(())
}

#[tokio::test]
async fn catalog_is_admin_managed() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, admin) = app.user("root@example.com", "admin").await?;
    let (_, customer) = app.user("ann@example.com", "customer").await?;
    let body = json!({"name": "Oil Change", "price": "49.99", "duration": 60});

    let (status, _) = app.json("POST", "/services/", Some(&customer), Some(body.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, _) = app.json("POST", "/services/", None, Some(body.clone())).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let id = app.catalog_entry(&admin, "Oil Change", "49.99").await?;
    let (status, resp) = app.json("POST", "/services/", Some(&admin), Some(body)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(resp["detail"], "Service with this name already exists");

    let (status, resp) = app
        .json("PUT", &format!("/services/{id}"), Some(&admin), Some(json!({"price": "59.50", "description": null})))
        .await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["price"], "59.50");
    assert!(resp["description"].is_null());

    let (status, resp) = app.json("DELETE", &format!("/services/{id}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resp["detail"], "Service deleted successfully");
    let (status, _) = app.json("GET", &format!("/services/{id}"), None, None).await?;
    assert_eq!(status, StatusCode::NOT_FOUND);
    Ok(())
}

#[tokio::test]
async fn cars_are_scoped_to_their_owner() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (_, ann) = app.user("ann@example.com", "customer").await?;
    let (bob_id, bob) = app.user("bob@example.com", "customer").await?;
    let (_, admin) = app.user("root@example.com", "admin").await?;

    let anns_car = app.car(&ann, "AAA111", "1HGCM82633A000001").await?;
    app.car(&bob, "BBB222", "1HGCM82633A000002").await?;

    let (_, list) = app.json("GET", "/cars/", Some(&ann), None).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(1));
    let (_, list) = app.json("GET", "/cars/", Some(&admin), None).await?;
    assert_eq!(list.as_array().map(Vec::len), Some(2));

    let (status, _) = app.json("GET", &format!("/cars/{anns_car}"), Some(&bob), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let dup = json!({"brand": "Honda", "model": "Civic", "year": 2020, "plate_number": "CCC333", "vin": "1HGCM82633A000001"});
    let (status, body) = app.json("POST", "/cars/", Some(&bob), Some(dup)).await?;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["detail"], "VIN already exists");

    let for_bob = json!({"brand": "Honda", "model": "Civic", "year": 2020, "plate_number": "DDD444", "vin": "1HGCM82633A000004", "user_id": bob_id});
    let (status, body) = app.json("POST", "/cars/", Some(&ann), Some(for_bob.clone())).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["detail"], "You can only add cars to your own profile");
    let (status, body) = app.json("POST", "/cars/", Some(&admin), Some(for_bob)).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["user_id"], bob_id);

    let (status, body) = app.json("PUT", &format!("/cars/{anns_car}"), Some(&ann), Some(json!({"model": "Camry"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["model"], "Camry");
    assert_eq!(body["plate_number"], "AAA111");

    let (status, body) = app.json("DELETE", &format!("/cars/{anns_car}"), Some(&ann), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Car deleted successfully");
    Ok(())
}

#[tokio::test]
async fn user_management_permissions() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (ann_id, ann) = app.user("ann@example.com", "customer").await?;
    let (bob_id, bob) = app.user("bob@example.com", "customer").await?;
    let (_, admin) = app.user("root@example.com", "admin").await?;

    let (status, _) = app.json("GET", "/users/", Some(&ann), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, list) = app.json("GET", "/users/", Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(3));

    let (status, _) = app.json("PUT", &format!("/users/{ann_id}"), Some(&ann), Some(json!({"role": "admin"}))).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.json("PUT", &format!("/users/{ann_id}"), Some(&ann), Some(json!({"name": "Ann Lee"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["name"], "Ann Lee");

    let (status, _) = app.json("DELETE", &format!("/users/{ann_id}"), Some(&bob), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, body) = app.json("DELETE", &format!("/users/{bob_id}"), Some(&admin), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "User deleted successfully");

    let (status, _) = app.json("GET", "/users/me", Some(&bob), None).await?;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    Ok(())
}

#[tokio::test]
async fn mechanic_management_permissions() -> anyhow::Result<()> {
    let app = spawn_app().await?;
    let (mike_id, mike) = app.mechanic("mike", "mechanic").await?;
    let (_, boss) = app.mechanic("boss", "admin").await?;

    let (status, _) = app.json("GET", "/mechanics/", Some(&mike), None).await?;
    assert_eq!(status, StatusCode::FORBIDDEN);
    let (status, list) = app.json("GET", "/mechanics/", Some(&boss), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(list.as_array().map(Vec::len), Some(2));

    let (status, body) = app.json("PUT", &format!("/mechanics/{mike_id}"), Some(&mike), Some(json!({"position": "Senior"}))).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["position"], "Senior");

    let (status, body) = app.json("DELETE", &format!("/mechanics/{mike_id}"), Some(&boss), None).await?;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["detail"], "Mechanic deleted successfully");
    Ok(())
}
