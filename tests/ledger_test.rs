mod common;

use std::collections::HashSet;

use anyhow::Result;
use common::{draft, parse_date, test_service};
use tally::application::{AppError, LedgerEvent};
use tally::domain::ValidationError;
use uuid::Uuid;

#[tokio::test]
async fn test_add_single_expense() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    service
        .add(&draft("Coffee", "4.50", "2025-05-21", "Food", false))
        .await?;

    assert_eq!(service.total_expense(), 450);
    assert_eq!(service.total_income(), 0);
    assert_eq!(service.total_balance(), -450);

    Ok(())
}

#[tokio::test]
async fn test_same_day_income_and_expense() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let salary = service
        .add(&draft("Salary", "3000", "2025-05-01", "Salary", true))
        .await?;
    let rent = service
        .add(&draft("Rent", "1200", "2025-05-01", "Bills", false))
        .await?;

    let groups = service.grouped_by_date();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0].label, "2025-05-01");
    assert_eq!(groups[0].transactions, vec![salary, rent]);
    assert_eq!(service.total_balance(), 180000);

    Ok(())
}

#[tokio::test]
async fn test_negative_amount_rejected() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    service
        .add(&draft("Lunch", "11", "2025-05-20", "Food", false))
        .await?;

    let today = chrono::Local::now().date_naive().format("%Y-%m-%d").to_string();
    let result = service.add(&draft("X", "-5", &today, "Food", false)).await;

    assert!(matches!(
        result,
        Err(AppError::Validation(ValidationError::NegativeAmount(_)))
    ));
    assert_eq!(service.list().len(), 1);

    Ok(())
}

#[tokio::test]
async fn test_invalid_fields_rejected() -> Result<()> {
    let (mut service, _temp) = test_service().await?;

    let empty_title = service
        .add(&draft("", "10", "2025-05-20", "Food", false))
        .await;
    assert!(matches!(
        empty_title,
        Err(AppError::Validation(ValidationError::EmptyTitle))
    ));

    let not_a_number = service
        .add(&draft("Lunch", "ten", "2025-05-20", "Food", false))
        .await;
    assert!(matches!(
        not_a_number,
        Err(AppError::Validation(ValidationError::InvalidAmount(_)))
    ));

    assert!(service.list().is_empty());
    Ok(())
}

#[tokio::test]
async fn test_update_unknown_id() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let unknown = Uuid::new_v4();

    let result = service
        .update(unknown, &draft("X", "1", "2025-05-21", "Food", false))
        .await;

    assert!(matches!(result, Err(AppError::TransactionNotFound(id)) if id == unknown));
    Ok(())
}

#[tokio::test]
async fn test_delete_then_delete_again() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let transaction = service
        .add(&draft("Taxi", "18", "2025-05-21", "Transport", false))
        .await?;

    service.delete(transaction.id).await?;
    assert!(!service.list().iter().any(|t| t.id == transaction.id));

    let second = service.delete(transaction.id).await;
    assert!(matches!(second, Err(AppError::TransactionNotFound(id)) if id == transaction.id));

    Ok(())
}

#[tokio::test]
async fn test_update_replaces_all_fields() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let original = service
        .add(&draft("Groceries", "40", "2025-05-02", "Food", false))
        .await?;

    let updated = service
        .update(
            original.id,
            &draft("Refund", "15.25", "2025-05-03", "Shopping", true),
        )
        .await?;

    assert_eq!(updated.id, original.id);
    assert_eq!(updated.title, "Refund");
    assert_eq!(updated.amount_cents, 1525);
    assert_eq!(updated.date, parse_date("2025-05-03"));
    assert_eq!(updated.category, "Shopping");
    assert!(updated.is_income);
    assert_eq!(service.get(original.id)?, &updated);
    assert_eq!(service.total_income(), 1525);
    assert_eq!(service.total_expense(), 0);

    Ok(())
}

#[tokio::test]
async fn test_invalid_update_leaves_transaction_unchanged() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let original = service
        .add(&draft("Gym", "30", "2025-05-02", "Miscellaneous", false))
        .await?;

    let result = service
        .update(original.id, &draft("Gym", "-30", "2025-05-02", "Miscellaneous", false))
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert_eq!(service.get(original.id)?, &original);

    Ok(())
}

#[tokio::test]
async fn test_ids_never_repeat() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let mut seen = HashSet::new();

    for i in 0..20 {
        let transaction = service
            .add(&draft("Entry", &format!("{}.25", i), "2025-05-01", "Food", i % 2 == 0))
            .await?;
        assert!(seen.insert(transaction.id));
        if i % 4 == 0 {
            service.delete(transaction.id).await?;
        }
        assert_eq!(
            service.total_balance(),
            service.total_income() - service.total_expense()
        );
    }

    Ok(())
}

#[tokio::test]
async fn test_grouped_view_partitions_list() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    for (title, date) in [
        ("Bus", "2025-05-03"),
        ("Dinner", "2025-05-01"),
        ("Cinema", "2025-05-03"),
        ("Flight", "2025-04-28"),
        ("Gift", "2025-05-02"),
    ] {
        service
            .add(&draft(title, "10", date, "Miscellaneous", false))
            .await?;
    }

    let groups = service.grouped_by_date();
    let labels: Vec<_> = groups.iter().map(|g| g.label.as_str()).collect();
    assert_eq!(
        labels,
        vec!["2025-05-03", "2025-05-02", "2025-05-01", "2025-04-28"]
    );

    let grouped: HashSet<_> = groups
        .iter()
        .flat_map(|g| g.transactions.iter().map(|t| t.id))
        .collect();
    let listed: HashSet<_> = service.list().iter().map(|t| t.id).collect();
    assert_eq!(grouped, listed);
    assert_eq!(
        groups.iter().map(|g| g.transactions.len()).sum::<usize>(),
        service.list().len()
    );

    let titles: Vec<_> = groups[0]
        .transactions
        .iter()
        .map(|t| t.title.as_str())
        .collect();
    assert_eq!(titles, vec!["Bus", "Cinema"]);

    Ok(())
}

#[tokio::test]
async fn test_unknown_category_tolerated() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let transaction = service
        .add(&draft("Vet", "80", "2025-05-02", "Pets", false))
        .await?;

    assert_eq!(transaction.category, "Pets");
    assert_eq!(transaction.icon(), tally::domain::FALLBACK_ICON);
    Ok(())
}

#[tokio::test]
async fn test_events_follow_mutations() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let mut events = service.subscribe();

    let added = service
        .add(&draft("Book", "12", "2025-05-02", "Shopping", false))
        .await?;
    let updated = service
        .update(added.id, &draft("Books", "24", "2025-05-02", "Shopping", false))
        .await?;
    let deleted = service.delete(added.id).await?;

    assert_eq!(events.recv().await?, LedgerEvent::Added(added.clone()));
    assert_eq!(
        events.recv().await?,
        LedgerEvent::Updated {
            before: added,
            after: updated,
        }
    );
    assert_eq!(events.recv().await?, LedgerEvent::Deleted(deleted));

    Ok(())
}

#[tokio::test]
async fn test_failed_mutation_emits_no_event() -> Result<()> {
    let (mut service, _temp) = test_service().await?;
    let mut events = service.subscribe();

    let _ = service
        .add(&draft("Bad", "oops", "2025-05-02", "Food", false))
        .await;
    let _ = service.delete(Uuid::new_v4()).await;

    assert!(events.try_recv().is_err());
    Ok(())
}
