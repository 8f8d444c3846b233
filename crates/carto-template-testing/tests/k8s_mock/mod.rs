mod fixtures;

use hyper::{Method, Request, Response, StatusCode};
use kube::client::Body;
use serde::Serialize;
use serde_json::json;
use tower_test::mock::{Handle, SendResponse};

pub(crate) async fn templates_scenario(handle: Handle<Request<Body>, Response<Body>>) {
    tokio::spawn(async move {
        let mut handle = handle;

        loop {
            let (request, send) = handle.next_request().await.expect("service not called");

            match (request.method(), request.uri().path()) {
                (&Method::GET, "/apis/carto.run/v1alpha1/clustersourcetemplates/git-repository") => {
                    send_response(send, StatusCode::OK, fixtures::git_repository_template());
                }
                (&Method::GET, "/apis/carto.run/v1alpha1/clusterimagetemplates/image") => {
                    send_response(send, StatusCode::OK, fixtures::image_template());
                }
                (&Method::GET, path) if path.starts_with("/apis/carto.run/v1alpha1/") => {
                    send_response(
                        send,
                        StatusCode::NOT_FOUND,
                        json!({
                            "kind": "Status",
                            "apiVersion": "v1",
                            "metadata": {},
                            "status": "Failure",
                            "message": format!("{path} not found"),
                            "reason": "NotFound",
                            "code": 404,
                        }),
                    );
                }
                _ => {
                    panic!("unexpected request: {:?}", request);
                }
            }
        }
    });
}

fn send_response<T: Serialize>(send: SendResponse<Response<Body>>, code: StatusCode, response: T) {
    let response = serde_json::to_vec(&response).unwrap();
    send.send_response(
        Response::builder()
            .status(code)
            .body(Body::from(response))
            .unwrap(),
    );
}
