use anyhow::Result;
use httpmock::prelude::*;
use secret_santa::domain::model::NotificationFailure;
use secret_santa::utils::error::{DirectoryError, ProviderError};
use secret_santa::utils::validation::Validate;
use secret_santa::{
    AssignmentEngine, ConsoleSender, Credentials, FamilyData, Notifier, NotificationStatus,
    Person, SantaConfig, SantaEngine, SantaError, TextMagicClient,
};
use serde_json::json;
use std::time::Duration;
use tempfile::TempDir;

const FAMILY_DATA: &str = r#"{
    "families": [["Anna", "Bertil"], ["Cecilia", "David"], ["Erik", "Frida"]],
    "phonenumbers": {
        "Anna": "+46700000001",
        "Bertil": "+46700000002",
        "Cecilia": "+46700000003",
        "David": "+46700000004",
        "Erik": "+46700000005"
    }
}"#;

fn write_inputs(dir: &TempDir, base_url: &str) -> Result<()> {
    std::fs::write(dir.path().join("family_data.json"), FAMILY_DATA)?;
    std::fs::write(
        dir.path().join("settings.yaml"),
        "username: tomten\ntoken: ${SANTA_E2E_TOKEN}\n",
    )?;
    std::fs::write(
        dir.path().join("santa.toml"),
        format!(
            r#"
[assignment]
strategy = "unique"
max_attempts = 500
seed = 2024

[notify]
delay_ms = 0
template = "Hej {{giver}}! Du ger till {{recipient}}."

[provider]
base_url = "{}"
"#,
            base_url
        ),
    )?;
    Ok(())
}

#[tokio::test]
async fn test_full_run_against_mock_provider() -> Result<()> {
    let server = MockServer::start_async().await;
    let accepted = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/messages")
                .header("X-TM-Username", "tomten")
                .header("X-TM-Key", "e2e-token")
                .json_body_partial(r#"{"phones": "+46700000001"}"#);
            then.status(201).json_body(json!({ "id": 1, "messageId": 1 }));
        })
        .await;
    let rejected = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/api/v2/messages")
                .json_body_partial(r#"{"phones": "+46700000002"}"#);
            then.status(400)
                .json_body(json!({ "code": 400, "message": "Invalid phone number" }));
        })
        .await;
    let others = ["+46700000003", "+46700000004", "+46700000005"];
    let mut other_mocks = Vec::new();
    for phone in others {
        other_mocks.push(
            server
                .mock_async(|when, then| {
                    when.method(POST)
                        .path("/api/v2/messages")
                        .json_body_partial(format!(r#"{{"phones": "{}"}}"#, phone));
                    then.status(201).json_body(json!({ "id": 2 }));
                })
                .await,
        );
    }

    let dir = TempDir::new()?;
    write_inputs(&dir, &server.base_url())?;
    std::env::set_var("SANTA_E2E_TOKEN", "e2e-token");

    let config = SantaConfig::load_or_default(dir.path().join("santa.toml"))?;
    config.validate()?;
    let data = FamilyData::from_file(dir.path().join("family_data.json"))?;
    let credentials = Credentials::from_file(dir.path().join("settings.yaml"))?;
    credentials.validate()?;

    let assigner = AssignmentEngine::seeded(config.assignment.seed.unwrap_or_default())
        .with_strategy(config.assignment.strategy)
        .with_max_attempts(config.assignment.max_attempts);
    let client = TextMagicClient::new(credentials, &config.provider.base_url, config.timeout())?;
    let notifier = Notifier::new(client)
        .with_template(config.template())
        .with_delay(config.delay());
    let mut engine = SantaEngine::new(assigner, notifier);

    let summary = engine.run(&data.families, &data.phonenumbers).await?;

    // 六人各一筆結果：四筆成功、Bertil 被拒、Frida 沒有號碼
    assert_eq!(summary.results.len(), 6);
    assert_eq!(summary.sent(), 4);
    assert_eq!(summary.failed(), 2);

    let status_of = |name: &str| {
        summary
            .results
            .iter()
            .find(|r| r.giver == Person::from(name))
            .map(|r| r.status.clone())
            .unwrap()
    };
    assert_eq!(
        status_of("Anna"),
        NotificationStatus::Sent {
            message_id: Some("1".to_string())
        }
    );
    assert_eq!(
        status_of("Bertil"),
        NotificationStatus::Failed(NotificationFailure::Provider(ProviderError::Rejected {
            status: 400,
            message: "Invalid phone number".to_string()
        }))
    );
    assert_eq!(
        status_of("Frida"),
        NotificationStatus::Failed(NotificationFailure::Directory(
            DirectoryError::MissingContact {
                giver: "Frida".to_string()
            }
        ))
    );

    accepted.assert_hits_async(1).await;
    rejected.assert_hits_async(1).await;
    for mock in &other_mocks {
        mock.assert_hits_async(1).await;
    }

    std::env::remove_var("SANTA_E2E_TOKEN");
    Ok(())
}

#[tokio::test]
async fn test_dry_run_sends_nothing() -> Result<()> {
    let server = MockServer::start_async().await;
    let provider = server
        .mock_async(|when, then| {
            when.any_request();
            then.status(201);
        })
        .await;

    let data = FamilyData::from_json_str(FAMILY_DATA)?;
    let notifier = Notifier::new(ConsoleSender::new()).with_delay(Duration::ZERO);
    let mut engine = SantaEngine::new(AssignmentEngine::seeded(5), notifier);

    let summary = engine.run(&data.families, &data.phonenumbers).await?;

    assert_eq!(summary.results.len(), 6);
    assert_eq!(summary.sent(), 5);
    provider.assert_hits_async(0).await;
    Ok(())
}

#[tokio::test]
async fn test_invalid_family_file_aborts_before_sending() -> Result<()> {
    let data = FamilyData::from_json_str(
        r#"{"families": [["Anna", "Anna"], ["Cecilia", "David"]], "phonenumbers": {}}"#,
    )?;
    let notifier = Notifier::new(ConsoleSender::new()).with_delay(Duration::ZERO);
    let mut engine = SantaEngine::new(AssignmentEngine::seeded(5), notifier);

    let err = engine
        .run(&data.families, &data.phonenumbers)
        .await
        .unwrap_err();

    assert!(matches!(err, SantaError::Assignment(_)));
    assert_eq!(err.exit_code(), 2);
    Ok(())
}

#[test]
fn test_missing_input_file_is_configuration_error() {
    let dir = TempDir::new().unwrap();
    let err = FamilyData::from_file(dir.path().join("family_data.json")).unwrap_err();

    assert!(matches!(err, SantaError::IoError(_)));
    assert_eq!(err.exit_code(), 1);
}
