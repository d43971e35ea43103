/// スキーマドリフト修復テスト
///
/// メタデータと物理スキーマがずれた状態（DDLの途中失敗や手動変更）を再現し、
/// 後続のフィールド更新が修復して SyncReport に記録することを検証します。
mod common;

#[cfg(test)]
mod schema_drift_tests {
    use super::common::{add_field, column_names, column_type, create_object, execute, sqlite_engine};
    use sphere::core::field::{ConstraintPatch, FieldPatch, FieldSpec};
    use sphere::core::schema::ColumnType;
    use sphere::core::sync::{ColumnChange, SchemaDrift};
    use sphere::services::field_service::UpdateFieldOutcome;
    use serde_json::json;

    async fn update(
        engine: &sphere::services::engine::SchemaEngine,
        object: &sphere::core::object::ObjectRecord,
        field_uuid: &str,
        patch: FieldPatch,
    ) -> sphere::core::sync::SyncReport {
        match engine
            .fields()
            .update_field(object, field_uuid, &patch)
            .await
            .unwrap()
        {
            UpdateFieldOutcome::Updated { sync, .. } => sync,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_table_is_recreated_on_update() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Tickets").await;
        let field = add_field(&engine, &object, FieldSpec::new("title", "Title", "short_text"))
            .await
            .field;
        execute(&engine, &format!("DROP TABLE \"{}\"", object.table_name())).await;

        let patch = FieldPatch {
            label: Some("Subject".to_string()),
            ..Default::default()
        };
        let sync = update(&engine, &object, &field.field_uuid, patch).await;

        assert!(sync.table_created);
        assert!(sync.column_added);
        assert_eq!(
            sync.drift,
            vec![SchemaDrift::TableMissing {
                table: "sph_object_tickets".to_string()
            }]
        );
        assert!(column_names(&engine, object.table_name())
            .await
            .contains(&"title".to_string()));
    }

    #[tokio::test]
    async fn test_missing_column_is_added_on_update() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Tickets").await;
        add_field(&engine, &object, FieldSpec::new("title", "Title", "short_text")).await;
        let field = add_field(&engine, &object, FieldSpec::new("body", "Body", "long_text"))
            .await
            .field;
        execute(
            &engine,
            &format!("ALTER TABLE \"{}\" DROP COLUMN \"body\"", object.table_name()),
        )
        .await;

        let patch = FieldPatch {
            description: Some("Ticket body".to_string()),
            ..Default::default()
        };
        let sync = update(&engine, &object, &field.field_uuid, patch).await;

        assert!(!sync.table_created);
        assert!(sync.column_added);
        assert!(!sync.type_altered);
        assert_eq!(
            sync.drift,
            vec![SchemaDrift::ColumnMissing {
                column: "body".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_rename_target_already_present() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Tickets").await;
        let field = add_field(&engine, &object, FieldSpec::new("title", "Title", "short_text"))
            .await
            .field;
        // 前回のリネームが物理スキーマにだけ反映された状態
        execute(
            &engine,
            &format!("ALTER TABLE \"{}\" ADD COLUMN \"subject\" TEXT", object.table_name()),
        )
        .await;

        let patch = FieldPatch {
            name: Some("subject".to_string()),
            ..Default::default()
        };
        let sync = update(&engine, &object, &field.field_uuid, patch).await;

        assert!(!sync.column_renamed);
        assert!(!sync.column_added);
        assert!(matches!(
            sync.drift.as_slice(),
            [SchemaDrift::RenameTargetPresent { .. }]
        ));
        let stored = engine.fields().get_field(&object, &field.field_uuid).await.unwrap();
        assert_eq!(stored.name, "subject");

        // 旧カラムは残り、レポートに手動削除が必要と記録される
        let columns = column_names(&engine, object.table_name()).await;
        assert!(columns.contains(&"title".to_string()));
        assert!(columns.contains(&"subject".to_string()));
        assert!(sync.drift[0].to_string().contains("old column 'title'"));
    }

    #[tokio::test]
    async fn test_retype_preserves_rows() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Reviews").await;
        let field = add_field(&engine, &object, FieldSpec::new("rating", "Rating", "short_text"))
            .await
            .field;
        add_field(&engine, &object, FieldSpec::new("comment", "Comment", "long_text")).await;

        engine
            .records()
            .insert_record(&object, &json!({"rating": "4", "comment": "good"}))
            .await
            .unwrap();

        let patch = FieldPatch {
            field_type: Some("star_rating".to_string()),
            ..Default::default()
        };
        let sync = update(&engine, &object, &field.field_uuid, patch).await;

        assert!(sync.type_altered);
        assert!(!sync.has_drift());
        assert_eq!(
            column_type(&engine, object.table_name(), "rating").await.as_deref(),
            Some("INTEGER")
        );

        let records = engine.records().list_records(&object).await.unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0]["rating"], json!("4"));
        assert_eq!(records[0]["comment"], json!("good"));
    }

    #[tokio::test]
    async fn test_length_change_is_noop_on_sqlite() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Reviews").await;
        let field = add_field(&engine, &object, FieldSpec::new("title", "Title", "short_text"))
            .await
            .field;

        let patch = FieldPatch {
            constraints: ConstraintPatch {
                max_length: Some(80),
                ..Default::default()
            },
            ..Default::default()
        };
        let sync = update(&engine, &object, &field.field_uuid, patch).await;

        assert!(sync.is_noop());
        let stored = engine.fields().get_field(&object, &field.field_uuid).await.unwrap();
        assert_eq!(stored.constraints.max_length, Some(80));
    }

    #[tokio::test]
    async fn test_retype_missing_column_reports_drift() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Reviews").await;
        add_field(&engine, &object, FieldSpec::new("title", "Title", "short_text")).await;
        let synchronizer = engine.fields().synchronizer();

        let sync = synchronizer
            .retype_column(object.table_name(), "ghost", None, &ColumnType::INTEGER)
            .await
            .unwrap();

        assert!(!sync.type_altered);
        assert_eq!(
            sync.drift,
            vec![SchemaDrift::RetypeTargetMissing {
                column: "ghost".to_string()
            }]
        );
    }

    #[tokio::test]
    async fn test_reconcile_is_idempotent() {
        let (_temp_dir, engine) = sqlite_engine().await;
        let object = create_object(&engine, "Reviews").await;
        add_field(&engine, &object, FieldSpec::new("title", "Title", "short_text")).await;
        let synchronizer = engine.fields().synchronizer();

        let change = ColumnChange {
            table: object.table_name().to_string(),
            old_column: "title".to_string(),
            new_column: "headline".to_string(),
            source_type: ColumnType::VARCHAR { length: 255 },
            target_type: ColumnType::VARCHAR { length: 255 },
        };

        let first = synchronizer.reconcile(&change).await.unwrap();
        assert!(first.column_renamed);

        // 2回目は旧カラムがないため、既存の新カラムを残して何もしない
        let second = synchronizer.reconcile(&change).await.unwrap();
        assert!(!second.column_renamed);
        assert!(!second.column_added);
        assert!(matches!(
            second.drift.as_slice(),
            [SchemaDrift::RenameSourceMissing { .. }]
        ));
        assert!(column_names(&engine, object.table_name())
            .await
            .contains(&"headline".to_string()));
    }
}
