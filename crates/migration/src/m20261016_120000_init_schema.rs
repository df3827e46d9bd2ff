use sea_orm_migration::prelude::*;
use sea_orm_migration::schema::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Users::Table)
                    .if_not_exists()
                    .col(string_len(Users::Id, 36).primary_key())
                    .col(string_len(Users::DisplayName, 120))
                    .col(string_len(Users::Email, 255).unique_key())
                    .col(string_len(Users::PasswordHash, 255))
                    // Role enum is represented in app code.
                    // 0=admin, 1=company, 2=student
                    .col(
                        small_integer(Users::Role)
                            .check(Expr::col(Users::Role).gte(0))
                            .check(Expr::col(Users::Role).lte(2)),
                    )
                    .col(timestamp(Users::CreatedAt).default(Expr::current_timestamp()))
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Companies::Table)
                    .if_not_exists()
                    .col(string_len(Companies::Id, 36).primary_key())
                    // One company profile per company account.
                    .col(string_len(Companies::OwnerId, 36).unique_key())
                    .col(string_len(Companies::Name, 200))
                    .col(string_len(Companies::RegistrationId, 64).unique_key())
                    .col(text(Companies::Description))
                    .col(timestamp(Companies::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-companies-owner_id")
                            .from(Companies::Table, Companies::OwnerId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Challenges::Table)
                    .if_not_exists()
                    .col(string_len(Challenges::Id, 36).primary_key())
                    .col(string_len(Challenges::CompanyId, 36))
                    .col(string_len(Challenges::Title, 200))
                    .col(text(Challenges::Description))
                    .col(timestamp(Challenges::CreatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-challenges-company_id")
                            .from(Challenges::Table, Challenges::CompanyId)
                            .to(Companies::Table, Companies::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Responses::Table)
                    .if_not_exists()
                    .col(string_len(Responses::Id, 36).primary_key())
                    .col(string_len(Responses::StudentId, 36))
                    .col(string_len(Responses::ChallengeId, 36))
                    .col(text(Responses::Body))
                    .col(timestamp(Responses::SubmittedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-responses-student_id")
                            .from(Responses::Table, Responses::StudentId)
                            .to(Users::Table, Users::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-responses-challenge_id")
                            .from(Responses::Table, Responses::ChallengeId)
                            .to(Challenges::Table, Challenges::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(Evaluations::Table)
                    .if_not_exists()
                    .col(string_len(Evaluations::Id, 36).primary_key())
                    // At most one evaluation per response.
                    .col(string_len(Evaluations::ResponseId, 36).unique_key())
                    .col(
                        double(Evaluations::Score)
                            .check(Expr::col(Evaluations::Score).gte(0.0))
                            .check(Expr::col(Evaluations::Score).lte(10.0)),
                    )
                    .col(text_null(Evaluations::Comment))
                    .col(timestamp(Evaluations::EvaluatedAt).default(Expr::current_timestamp()))
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-evaluations-response_id")
                            .from(Evaluations::Table, Evaluations::ResponseId)
                            .to(Responses::Table, Responses::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_responses_student_challenge")
                    .table(Responses::Table)
                    .col(Responses::StudentId)
                    .col(Responses::ChallengeId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_responses_challenge_id")
                    .table(Responses::Table)
                    .col(Responses::ChallengeId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_challenges_company_id")
                    .table(Challenges::Table)
                    .col(Challenges::CompanyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_users_role")
                    .table(Users::Table)
                    .col(Users::Role)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Evaluations::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Responses::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Challenges::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Companies::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Users::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(DeriveIden)]
enum Users {
    Table,
    Id,
    DisplayName,
    Email,
    PasswordHash,
    Role,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Companies {
    Table,
    Id,
    OwnerId,
    Name,
    RegistrationId,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Challenges {
    Table,
    Id,
    CompanyId,
    Title,
    Description,
    CreatedAt,
}

#[derive(DeriveIden)]
enum Responses {
    Table,
    Id,
    StudentId,
    ChallengeId,
    Body,
    SubmittedAt,
}

#[derive(DeriveIden)]
enum Evaluations {
    Table,
    Id,
    ResponseId,
    Score,
    Comment,
    EvaluatedAt,
}
