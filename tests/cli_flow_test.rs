/// CLIフローテスト
///
/// 一時ディレクトリ上で init → setup → object → field → record の順にハンドラーを実行し、
/// 設定ファイルの相対パス解決を含むエンドツーエンドの流れを検証します。
#[cfg(test)]
mod cli_flow_tests {
    use clap::Parser;
    use sphere::cli::commands::field::{FieldCommand, FieldCommandHandler, FieldStatus};
    use sphere::cli::commands::init::{InitCommand, InitCommandHandler};
    use sphere::cli::commands::object::{ObjectCommand, ObjectCommandHandler, ObjectStatus};
    use sphere::cli::commands::record::{RecordCommand, RecordCommandHandler, RecordStatus};
    use sphere::cli::commands::setup::{SetupCommand, SetupCommandHandler};
    use sphere::cli::{Cli, Commands, FieldCommands, ObjectCommands, RecordCommands};
    use sphere::core::config::Dialect;
    use sphere::services::config_loader::ConfigLoader;
    use std::path::PathBuf;
    use tempfile::TempDir;

    const ENV: &str = "development";

    fn parse(args: &[&str]) -> Commands {
        let mut argv = vec!["sphere"];
        argv.extend_from_slice(args);
        Cli::try_parse_from(argv).unwrap().command
    }

    fn object_action(args: &[&str]) -> ObjectCommands {
        match parse(args) {
            Commands::Object(action) => action,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn field_action(args: &[&str]) -> FieldCommands {
        match parse(args) {
            Commands::Field(action) => action,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn record_action(args: &[&str]) -> RecordCommands {
        match parse(args) {
            Commands::Record(action) => action,
            other => panic!("unexpected command: {:?}", other),
        }
    }

    fn init_project(project_path: PathBuf) {
        let handler = InitCommandHandler::new();
        let output = handler
            .execute(&InitCommand {
                project_path,
                config_path: None,
                dialect: Dialect::SQLite,
                force: false,
                database_name: None,
            })
            .unwrap();
        assert_eq!(output.database, "sphere_dev.db");
    }

    #[test]
    fn test_init_refuses_to_overwrite() {
        let temp_dir = TempDir::new().unwrap();
        let project_path = temp_dir.path().to_path_buf();
        init_project(project_path.clone());

        let config = ConfigLoader::from_file(&project_path.join(".sphere.yaml")).unwrap();
        assert_eq!(config.dialect, Dialect::SQLite);
        assert!(config.environments.contains_key(ENV));

        let err = InitCommandHandler::new()
            .execute(&InitCommand {
                project_path: project_path.clone(),
                config_path: None,
                dialect: Dialect::PostgreSQL,
                force: false,
                database_name: None,
            })
            .unwrap_err();
        assert!(err.to_string().contains("already exists"));

        InitCommandHandler::new()
            .execute(&InitCommand {
                project_path: project_path.clone(),
                config_path: None,
                dialect: Dialect::PostgreSQL,
                force: true,
                database_name: Some("crm".to_string()),
            })
            .unwrap();
        let config = ConfigLoader::from_file(&project_path.join(".sphere.yaml")).unwrap();
        assert_eq!(config.dialect, Dialect::PostgreSQL);
        assert_eq!(config.get_database_config(ENV).unwrap().database, "crm");
    }

    #[tokio::test]
    async fn test_end_to_end_flow() {
        sqlx::any::install_default_drivers();

        let temp_dir = TempDir::new().unwrap();
        let project_path = temp_dir.path().to_path_buf();
        init_project(project_path.clone());

        // メタデータテーブルの作成（2回実行しても成功する）
        for _ in 0..2 {
            let output = SetupCommandHandler::new()
                .execute(&SetupCommand {
                    project_path: project_path.clone(),
                    config_path: None,
                    env: ENV.to_string(),
                })
                .await
                .unwrap();
            assert_eq!(output.tables, vec!["sph_objects", "sph_object_fields"]);
        }
        // SQLiteの相対パスは設定ファイルの場所を基準に解決される
        assert!(project_path.join("sphere_dev.db").exists());

        let object_command = |action| ObjectCommand {
            project_path: project_path.clone(),
            config_path: None,
            env: ENV.to_string(),
            action,
        };
        let objects = ObjectCommandHandler::new();

        let created = objects
            .execute(&object_command(object_action(&[
                "object", "create", "Survey", "-d", "Customer survey",
            ])))
            .await
            .unwrap();
        assert_eq!(created.status, ObjectStatus::Created);
        let object_uuid = created.objects[0].object_uuid.clone();

        let again = objects
            .execute(&object_command(object_action(&["object", "create", "survey"])))
            .await
            .unwrap();
        assert_eq!(again.status, ObjectStatus::AlreadyExists);

        // 名前でも解決できる
        let found = objects
            .execute(&object_command(object_action(&["object", "get", "SURVEY"])))
            .await
            .unwrap();
        assert_eq!(found.objects[0].object_uuid, object_uuid);

        let field_command = |action| FieldCommand {
            project_path: project_path.clone(),
            config_path: None,
            env: ENV.to_string(),
            action,
        };
        let fields = FieldCommandHandler::new();

        let added = fields
            .execute(&field_command(field_action(&[
                "field", "add", "-o", &object_uuid, "--name", "Score", "--label", "Score", "-t",
                "number", "--min-value", "0", "--max-value", "10",
            ])))
            .await
            .unwrap();
        assert_eq!(added.status, FieldStatus::Created);
        assert_eq!(added.table_name, "sph_object_survey");
        assert_eq!(added.column_name.as_deref(), Some("score"));
        assert_eq!(added.column_type.as_deref(), Some("NUMERIC"));

        let invalid = fields
            .execute(&field_command(field_action(&[
                "field", "add", "-o", &object_uuid, "--name", "bad", "--label", "Bad", "-t",
                "number", "--min-value", "10", "--max-value", "1",
            ])))
            .await;
        assert!(invalid.is_err());

        let record_command = |action| RecordCommand {
            project_path: project_path.clone(),
            config_path: None,
            env: ENV.to_string(),
            action,
        };
        let records = RecordCommandHandler::new();

        let inserted = records
            .execute(&record_command(record_action(&[
                "record", "insert", "-o", "Survey", "--data", r#"{"score": 7}"#,
            ])))
            .await
            .unwrap();
        assert_eq!(inserted.status, RecordStatus::Inserted);
        assert!(inserted.record_uuid.is_some());

        let listed = records
            .execute(&record_command(record_action(&["record", "list", "-o", "Survey"])))
            .await
            .unwrap();
        assert_eq!(listed.status, RecordStatus::Listed);
        assert_eq!(listed.records.len(), 1);
        assert_eq!(listed.records[0]["score"], serde_json::json!("7"));

        let deleted = objects
            .execute(&object_command(object_action(&["object", "delete", &object_uuid])))
            .await
            .unwrap();
        assert_eq!(deleted.status, ObjectStatus::Deleted);

        let listed = objects
            .execute(&object_command(object_action(&["object", "list"])))
            .await
            .unwrap();
        assert!(listed.objects.is_empty());
    }
}
