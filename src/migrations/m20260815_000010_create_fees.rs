//! Migration: Create fee_structures, student_fees, fee_payments and
//! ledger_entries tables

use sea_orm_migration::prelude::*;

use super::m20260815_000001_create_schools::Schools;
use super::m20260815_000005_create_students::Students;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(FeeStructures::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeeStructures::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::SessionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeeStructures::ClassId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeeStructures::Name).string().not_null())
                    .col(ColumnDef::new(FeeStructures::Amount).double().not_null())
                    .col(
                        ColumnDef::new(FeeStructures::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeeStructures::Table, FeeStructures::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(StudentFees::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(StudentFees::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(StudentFees::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFees::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFees::FeeStructureId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFees::TotalAmount)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFees::ConcessionAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(StudentFees::PaidAmount)
                            .double()
                            .not_null()
                            .default(0.0),
                    )
                    .col(
                        ColumnDef::new(StudentFees::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(StudentFees::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentFees::Table, StudentFees::StudentId)
                            .to(Students::Table, Students::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(StudentFees::Table, StudentFees::FeeStructureId)
                            .to(FeeStructures::Table, FeeStructures::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_student_fees_student")
                    .table(StudentFees::Table)
                    .col(StudentFees::StudentId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(FeePayments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(FeePayments::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(FeePayments::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(FeePayments::StudentFeeId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(FeePayments::Amount).double().not_null())
                    .col(
                        ColumnDef::new(FeePayments::ReceiptNumber)
                            .string()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(FeePayments::Note).string().null())
                    .col(ColumnDef::new(FeePayments::CollectedBy).big_integer().null())
                    .col(
                        ColumnDef::new(FeePayments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(FeePayments::Table, FeePayments::StudentFeeId)
                            .to(StudentFees::Table, StudentFees::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_fee_payments_school")
                    .table(FeePayments::Table)
                    .col(FeePayments::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(LedgerEntries::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(LedgerEntries::Id)
                            .big_integer()
                            .not_null()
                            .auto_increment()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::SchoolId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(LedgerEntries::EntryType)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(LedgerEntries::Category).string().not_null())
                    .col(ColumnDef::new(LedgerEntries::Amount).double().not_null())
                    .col(ColumnDef::new(LedgerEntries::Reference).string().null())
                    .col(ColumnDef::new(LedgerEntries::Note).string().null())
                    .col(
                        ColumnDef::new(LedgerEntries::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(LedgerEntries::Table, LedgerEntries::SchoolId)
                            .to(Schools::Table, Schools::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_ledger_entries_school")
                    .table(LedgerEntries::Table)
                    .col(LedgerEntries::SchoolId)
                    .if_not_exists()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(
                Table::drop()
                    .table(LedgerEntries::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(FeePayments::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(StudentFees::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await?;
        manager
            .drop_table(
                Table::drop()
                    .table(FeeStructures::Table)
                    .if_exists()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
#[iden = "fee_structures"]
pub enum FeeStructures {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "session_id"]
    SessionId,
    #[iden = "class_id"]
    ClassId,
    Name,
    Amount,
    #[iden = "created_at"]
    CreatedAt,
}

#[derive(Iden)]
#[iden = "student_fees"]
pub enum StudentFees {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "student_id"]
    StudentId,
    #[iden = "fee_structure_id"]
    FeeStructureId,
    #[iden = "total_amount"]
    TotalAmount,
    #[iden = "concession_amount"]
    ConcessionAmount,
    #[iden = "paid_amount"]
    PaidAmount,
    #[iden = "created_at"]
    CreatedAt,
    #[iden = "updated_at"]
    UpdatedAt,
}

#[derive(Iden)]
#[iden = "fee_payments"]
pub enum FeePayments {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "student_fee_id"]
    StudentFeeId,
    Amount,
    #[iden = "receipt_number"]
    ReceiptNumber,
    Note,
    #[iden = "collected_by"]
    CollectedBy,
    #[iden = "created_at"]
    CreatedAt,
}

#[derive(Iden)]
#[iden = "ledger_entries"]
pub enum LedgerEntries {
    Table,
    Id,
    #[iden = "school_id"]
    SchoolId,
    #[iden = "entry_type"]
    EntryType,
    Category,
    Amount,
    Reference,
    Note,
    #[iden = "created_at"]
    CreatedAt,
}
