/// PostgreSQL統合テスト
///
/// testcontainersで起動したPostgreSQLに対して、オブジェクト作成からフィールドの
/// 追加・リネーム・型変更（USING句によるキャスト）・削除までを検証します。
///
/// 注意: Docker必須のテストは #[ignore] アトリビュートでマークされています。
/// Docker起動時に実行するには: `cargo test postgres_integration -- --ignored`
#[cfg(test)]
mod postgres_integration_tests {
    use serde_json::json;
    use sphere::adapters::database::DatabaseConnectionService;
    use sphere::adapters::database_introspector::{create_introspector, SchemaIntrospector};
    use sphere::core::config::{DatabaseConfig, Dialect, FieldLimits};
    use sphere::core::field::{FieldPatch, FieldSpec};
    use sphere::core::object::NewObject;
    use sphere::services::engine::SchemaEngine;
    use sphere::services::field_service::{AddFieldOutcome, UpdateFieldOutcome};
    use sphere::services::object_directory::CreateObjectOutcome;
    use testcontainers::{runners::AsyncRunner, ContainerAsync, ImageExt};
    use testcontainers_modules::postgres::Postgres;

    /// PostgreSQLコンテナを起動してエンジンを作成
    async fn setup_postgres_engine() -> Result<
        (ContainerAsync<Postgres>, SchemaEngine),
        Box<dyn std::error::Error>,
    > {
        sqlx::any::install_default_drivers();

        let container = Postgres::default()
            .with_tag("16-alpine")
            .start()
            .await?;

        let host = container.get_host().await?;
        let port = container.get_host_port_ipv4(5432).await?;
        let db_config = DatabaseConfig {
            host: host.to_string(),
            port: Some(port),
            database: "postgres".to_string(),
            user: Some("postgres".to_string()),
            password: Some("postgres".to_string()),
            timeout: Some(30),
        };

        let pool = DatabaseConnectionService::new()
            .create_pool(Dialect::PostgreSQL, &db_config)
            .await?;
        let engine = SchemaEngine::from_pool(pool, Dialect::PostgreSQL, FieldLimits::default());
        engine.install().await?;

        Ok((container, engine))
    }

    async fn column_type(engine: &SchemaEngine, table: &str, column: &str) -> Option<String> {
        create_introspector(engine.dialect())
            .get_columns(engine.pool(), table)
            .await
            .unwrap()
            .into_iter()
            .find(|c| c.name == column)
            .map(|c| c.data_type)
    }

    #[tokio::test]
    #[ignore] // Docker必須
    async fn test_full_field_lifecycle() {
        let (_container, engine) = setup_postgres_engine().await.unwrap();

        // 再実行しても失敗しない
        engine.install().await.unwrap();

        let object = match engine
            .objects()
            .create_object(&NewObject::new("Customer Feedback", None))
            .await
            .unwrap()
        {
            CreateObjectOutcome::Created(object) => object,
            other => panic!("unexpected outcome: {:?}", other),
        };
        let table = object.table_name().to_string();
        assert_eq!(table, "sph_object_customer_feedback");

        let rating = match engine
            .fields()
            .add_field(&object, &FieldSpec::new("rating", "Rating", "short_text"))
            .await
            .unwrap()
        {
            AddFieldOutcome::Created(added) => {
                assert!(added.table_created);
                added.field
            }
            other => panic!("unexpected outcome: {:?}", other),
        };
        assert_eq!(
            column_type(&engine, &table, "rating").await.as_deref(),
            Some("character varying")
        );

        engine
            .records()
            .insert_record(&object, &json!({"rating": "4"}))
            .await
            .unwrap();

        // リネーム
        let patch = FieldPatch {
            name: Some("score".to_string()),
            ..Default::default()
        };
        match engine
            .fields()
            .update_field(&object, &rating.field_uuid, &patch)
            .await
            .unwrap()
        {
            UpdateFieldOutcome::Updated { sync, .. } => assert!(sync.column_renamed),
            other => panic!("unexpected outcome: {:?}", other),
        }

        // 型変更（既存データは USING 句でキャストされる）
        let patch = FieldPatch {
            field_type: Some("star_rating".to_string()),
            ..Default::default()
        };
        match engine
            .fields()
            .update_field(&object, &rating.field_uuid, &patch)
            .await
            .unwrap()
        {
            UpdateFieldOutcome::Updated { sync, .. } => {
                assert!(sync.type_altered);
                assert!(!sync.has_drift());
            }
            other => panic!("unexpected outcome: {:?}", other),
        }
        assert_eq!(
            column_type(&engine, &table, "score").await.as_deref(),
            Some("integer")
        );

        let records = engine.records().list_records(&object).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["score"], json!("4"));

        // 削除
        let deleted = engine
            .fields()
            .delete_field(&object, &rating.field_uuid)
            .await
            .unwrap();
        assert!(deleted.column_dropped);
        assert_eq!(column_type(&engine, &table, "score").await, None);
        assert!(engine.fields().list_fields(&object).await.unwrap().is_empty());

        engine.close().await;
    }

    #[tokio::test]
    #[ignore] // Docker必須
    async fn test_duplicate_field_maps_to_soft_outcome() {
        let (_container, engine) = setup_postgres_engine().await.unwrap();

        let object = match engine
            .objects()
            .create_object(&NewObject::new("Leads", None))
            .await
            .unwrap()
        {
            CreateObjectOutcome::Created(object) => object,
            other => panic!("unexpected outcome: {:?}", other),
        };

        let spec = FieldSpec::new("email", "Email", "email");
        let first = engine.fields().add_field(&object, &spec).await.unwrap();
        assert!(matches!(first, AddFieldOutcome::Created(_)));

        let second = engine
            .fields()
            .add_field(&object, &FieldSpec::new("EMAIL", "Email", "email"))
            .await
            .unwrap();
        assert!(matches!(second, AddFieldOutcome::AlreadyExists { .. }));
    }
}
