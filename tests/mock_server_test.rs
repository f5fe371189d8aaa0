// Copyright 2025 Lablup Inc. and Jeongkyu Shin
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! End-to-end runs of the shrub command against mock repository files.

use std::path::Path;
use tempfile::TempDir;

use wbemcli::cim::DEFAULT_FOLD_WIDTH;
use wbemcli::cli::ShrubArgs;
use wbemcli::commands::shrub::show_shrub;
use wbemcli::config::{Config, ConnectionOverrides};
use wbemcli::connection::ServerDefinition;
use wbemcli::shrub::CollectionStrategy;
use wbemcli::ui::OutputFormat;

const REPOSITORY: &str = r#"
host: testhost
classes:
  - name: CIM_Dependency
  - name: TST_Hosted
    superclass: CIM_Dependency
instances:
  - path: 'TST_System.name="sys1"'
  - path: 'TST_Service.name="svc1"'
  - path: 'TST_Service.name="svc2"'
  - path: 'TST_Hosted.InstanceID="h1"'
    properties:
      antecedent: {type: reference, value: 'TST_System.name="sys1"'}
      dependent: {type: reference, value: 'TST_Service.name="svc1"'}
  - path: 'TST_Hosted.InstanceID="h2"'
    properties:
      antecedent: {type: reference, value: 'TST_System.name="sys1"'}
      dependent: {type: reference, value: 'TST_Service.name="svc2"'}
"#;

fn write_repository(dir: &TempDir, content: &str) -> std::path::PathBuf {
    let path = dir.path().join("repo.yaml");
    std::fs::write(&path, content).unwrap();
    path
}

fn shrub_args(instancename: &str) -> ShrubArgs {
    ShrubArgs {
        instancename: instancename.to_string(),
        role: None,
        assoc_class: None,
        result_role: None,
        result_class: None,
        namespace: None,
        summary: false,
        fold_width: DEFAULT_FOLD_WIDTH,
        show_skipped: false,
        strategy: CollectionStrategy::PerClassQuery,
    }
}

async fn run(mock: &Path, args: &ShrubArgs, format: OutputFormat) -> anyhow::Result<String> {
    let mut server = ServerDefinition {
        mock_server: Some(mock.to_path_buf()),
        ..Default::default()
    };
    let conn = server.open().await?;
    show_shrub(conn.as_ref(), args, format).await
}

#[tokio::test]
async fn test_tree_from_repository_file() {
    let dir = TempDir::new().unwrap();
    let repo = write_repository(&dir, REPOSITORY);

    let output = run(&repo, &shrub_args("TST_System.name=\"sys1\""), OutputFormat::Tree)
        .await
        .unwrap();

    let expected = "\
/:TST_System.name=\"sys1\"
 +-- antecedent(Role)
     +-- TST_Hosted(AssocClass)
         +-- dependent(ResultRole)
             +-- TST_Service(ResultClass)(2 insts)
                 +-- /:TST_Service.name=\"svc1\"
                 +-- /:TST_Service.name=\"svc2\"
";
    assert_eq!(output, expected);
}

#[tokio::test]
async fn test_summary_table_from_repository_file() {
    let dir = TempDir::new().unwrap();
    let repo = write_repository(&dir, REPOSITORY);

    let mut args = shrub_args("TST_System.name=\"sys1\"");
    args.summary = true;
    let output = run(&repo, &args, OutputFormat::Psql).await.unwrap();

    assert!(output.contains("Shrub of //testhost/root/cimv2:TST_System.name=\"sys1\""));
    assert!(output.contains("Assoc Inst Count"));
    assert!(output.contains("TST_Hosted"));
    assert!(output.contains("TST_Service"));
    assert!(!output.contains("svc1"));
}

#[tokio::test]
async fn test_reverse_direction() {
    let dir = TempDir::new().unwrap();
    let repo = write_repository(&dir, REPOSITORY);

    let output = run(&repo, &shrub_args("TST_Service.name=\"svc2\""), OutputFormat::Tree)
        .await
        .unwrap();
    assert!(output.contains("dependent(Role)"));
    assert!(output.contains("antecedent(ResultRole)"));
    assert!(output.contains("TST_System(ResultClass)(1 insts)"));
    assert!(!output.contains("svc1"));
}

#[tokio::test]
async fn test_assoc_class_filter() {
    let dir = TempDir::new().unwrap();
    let repo = write_repository(&dir, REPOSITORY);

    let mut args = shrub_args("TST_System.name=\"sys1\"");
    args.assoc_class = Some("TST_Hosted".to_string());
    let output = run(&repo, &args, OutputFormat::Tree).await.unwrap();
    assert!(output.contains("TST_Hosted(AssocClass)"));

    args.assoc_class = Some("TST_Other".to_string());
    let output = run(&repo, &args, OutputFormat::Tree).await.unwrap();
    assert_eq!(output, "/:TST_System.name=\"sys1\"\n");
}

#[tokio::test]
async fn test_skipped_reference_class_reported() {
    let dir = TempDir::new().unwrap();
    let content = format!(
        "{REPOSITORY}faults:\n  - operation: GetInstance\n    path: 'TST_Hosted.InstanceID=\"h1\"'\n    status: 2\n    description: hidden association\n"
    );
    let repo = write_repository(&dir, &content);

    let mut args = shrub_args("TST_System.name=\"sys1\"");
    let quiet = run(&repo, &args, OutputFormat::Tree).await.unwrap();
    assert_eq!(quiet, "/:TST_System.name=\"sys1\"\n");

    args.show_skipped = true;
    let reported = run(&repo, &args, OutputFormat::Tree).await.unwrap();
    assert!(reported.contains("reference classes skipped"));
    assert!(reported.contains("TST_Hosted"));
    assert!(reported.contains("hidden association"));
}

#[tokio::test]
async fn test_class_path_is_rejected() {
    let dir = TempDir::new().unwrap();
    let repo = write_repository(&dir, REPOSITORY);

    let err = run(&repo, &shrub_args("TST_System"), OutputFormat::Tree)
        .await
        .unwrap_err();
    assert!(err.to_string().contains("is a class path"));
}

#[tokio::test]
async fn test_missing_repository_file() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("absent.yaml");

    let err = run(&missing, &shrub_args("TST_System.name=\"sys1\""), OutputFormat::Tree)
        .await
        .err()
        .expect("missing repository must fail");
    assert!(format!("{err:#}").contains("Failed to load mock server"));
}

#[tokio::test]
async fn test_named_connection_from_config_file() {
    let dir = TempDir::new().unwrap();
    let repo = write_repository(&dir, REPOSITORY);
    let config_path = dir.path().join("connections.yaml");
    std::fs::write(
        &config_path,
        format!(
            "default: lab\nconnections:\n  lab:\n    mock_server: {}\n    default_namespace: root/cimv2\n",
            repo.display()
        ),
    )
    .unwrap();

    let config = Config::load_with_priority(Some(&config_path)).await.unwrap();
    let mut server = config
        .resolve_server(&ConnectionOverrides::default())
        .unwrap();
    assert_eq!(server.name, "lab");
    assert_eq!(server.mock_server.as_deref(), Some(repo.as_path()));

    let conn = server.open().await.unwrap();
    let output = show_shrub(
        conn.as_ref(),
        &shrub_args("TST_Service.name=\"svc1\""),
        OutputFormat::Tree,
    )
    .await
    .unwrap();
    assert!(output.contains("TST_System(ResultClass)(1 insts)"));
}

#[tokio::test]
async fn test_remote_server_is_not_available() {
    let mut server = ServerDefinition {
        server: Some("https://cimom.example.com".to_string()),
        ..Default::default()
    };
    let err = server.open().await.err().expect("no remote transport");
    assert!(err.to_string().contains("cimom.example.com"));
}
