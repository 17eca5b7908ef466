use std::time::Duration;

use panel_core::{OperationOutcome, ServerStatus};
use panel_engine::{Backend, BackendSettings, FailureKind, ReqwestBackend};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn backend_for(server: &MockServer) -> ReqwestBackend {
    ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        ..BackendSettings::default()
    })
    .expect("backend")
}

#[tokio::test]
async fn verify_passes_archive_url_as_query() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verificar-maior-zip"))
        .and(query_param("url", "https://revistas.inpi.gov.br/rpi/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Maior arquivo encontrado: P2790.zip",
            "arquivo": "https://revistas.inpi.gov.br/txt/P2790.zip",
            "nome_arquivo": "P2790.zip"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .verify_largest_zip("https://revistas.inpi.gov.br/rpi/")
        .await
        .expect("verify ok");

    assert!(response.success);
    assert_eq!(response.nome_arquivo.as_deref(), Some("P2790.zip"));
    match response.into_outcome() {
        OperationOutcome::Succeeded(report) => {
            assert_eq!(report.file_name.as_deref(), Some("P2790.zip"));
            assert_eq!(
                report.file_url.as_deref(),
                Some("https://revistas.inpi.gov.br/txt/P2790.zip")
            );
        }
        other => panic!("unexpected outcome {other:?}"),
    }
}

#[tokio::test]
async fn process_posts_search_body_and_parses_results() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/processar-completo"))
        .and(body_json(json!({
            "url": "https://revistas.inpi.gov.br/rpi/",
            "string_busca": "foo"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Processo concluído! 1 ocorrência(s) encontrada(s)",
            "resultado": {
                "url_arquivo": "https://revistas.inpi.gov.br/txt/P2790.zip",
                "total_encontrados": 1,
                "arquivos_txt": ["P2790.txt"],
                "resultados": [{
                    "arquivo": "P2790.txt",
                    "linha_encontrada": 12,
                    "total_linhas_contexto": 5,
                    "linha_inicio": 10,
                    "linha_fim": 14,
                    "contexto_completo": "before\nfoo\nafter"
                }]
            }
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .process_complete("https://revistas.inpi.gov.br/rpi/", "foo")
        .await
        .expect("process ok");

    let OperationOutcome::Succeeded(report) = response.into_outcome() else {
        panic!("expected success");
    };
    let occurrences = report.occurrences.expect("occurrences");
    assert_eq!(occurrences.total, 1);
    assert_eq!(occurrences.text_files, vec!["P2790.txt".to_string()]);
    assert_eq!(occurrences.details[0].matched_line, 12);
    assert_eq!(occurrences.details[0].excerpt, "before\nfoo\nafter");
}

#[tokio::test]
async fn download_sends_last_file_and_reports_rejection() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/baixar-zip"))
        .and(body_json(json!({ "arquivo": "P2790.zip" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Arquivo indisponível"
        })))
        .mount(&server)
        .await;

    let response = backend_for(&server)
        .download_zip(Some("P2790.zip"))
        .await
        .expect("download answered");

    assert_eq!(
        response.into_outcome(),
        OperationOutcome::Rejected {
            message: "Arquivo indisponível".to_string()
        }
    );
}

#[tokio::test]
async fn download_without_file_sends_null() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/baixar-zip"))
        .and(body_json(json!({ "arquivo": null })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Download simulado com sucesso"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let response = backend_for(&server).download_zip(None).await.unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn logs_are_returned_in_server_order() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "logs": [
                {"timestamp": "10:00:01", "level": "info", "message": "Status Code: 200"},
                {"timestamp": "10:00:02", "level": "success", "message": "P2790.zip"}
            ]
        })))
        .mount(&server)
        .await;

    let logs = backend_for(&server).fetch_logs().await.unwrap();
    let messages: Vec<_> = logs.iter().map(|log| log.message.as_str()).collect();
    assert_eq!(messages, vec!["Status Code: 200", "P2790.zip"]);
    assert_eq!(logs[1].level, "success");
}

#[tokio::test]
async fn non_json_body_is_a_decode_failure() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/verificar-maior-zip"))
        .respond_with(ResponseTemplate::new(500).set_body_string("<html>Internal Server Error</html>"))
        .mount(&server)
        .await;

    let err = backend_for(&server)
        .verify_largest_zip("https://revistas.inpi.gov.br/rpi/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, FailureKind::Decode);
}

#[tokio::test]
async fn clear_logs_requires_success_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/clear-logs"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let err = backend_for(&server).clear_logs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::HttpStatus(503));
}

#[tokio::test]
async fn status_maps_http_outcomes() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"status": "online"})))
        .up_to_n_times(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/status"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let backend = backend_for(&server);
    assert_eq!(backend.status().await, ServerStatus::Online);
    assert_eq!(backend.status().await, ServerStatus::Unstable);

    let offline = ReqwestBackend::new(BackendSettings {
        base_url: "http://127.0.0.1:9".to_string(),
        connect_timeout: Duration::from_millis(200),
        request_timeout: Duration::from_millis(500),
    })
    .unwrap();
    assert_eq!(offline.status().await, ServerStatus::Offline);
}

#[tokio::test]
async fn slow_backend_times_out() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/logs"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_delay(Duration::from_millis(250))
                .set_body_json(json!({"logs": []})),
        )
        .mount(&server)
        .await;

    let backend = ReqwestBackend::new(BackendSettings {
        base_url: server.uri(),
        request_timeout: Duration::from_millis(50),
        ..BackendSettings::default()
    })
    .unwrap();

    let err = backend.fetch_logs().await.unwrap_err();
    assert_eq!(err.kind, FailureKind::Timeout);
}

#[test]
fn invalid_base_url_is_rejected() {
    let err = ReqwestBackend::new(BackendSettings {
        base_url: "not a url".to_string(),
        ..BackendSettings::default()
    })
    .unwrap_err();
    assert_eq!(err.kind, FailureKind::InvalidUrl);
}
