use crate::commands::CommandResult;
use clap::{Args, Subcommand};
use rusqlite::Connection;
use rust_decimal::Decimal;
use stockledger_core::{
    Product, ProductCategory, ProductDraft, ProductId, ProductService, ServiceError,
    SqliteMovementRepository, SqliteProductRepository,
};

#[derive(Debug, Subcommand)]
pub enum ProductCommand {
    #[command(about = "Create a product with its opening stock")]
    Create {
        #[command(flatten)]
        fields: ProductFields,
        #[arg(long, default_value_t = 0, help = "Opening stock quantity")]
        stock: u32,
    },
    #[command(about = "Show one product")]
    Get { id: ProductId },
    #[command(about = "List products, optionally filtered by category")]
    List {
        #[arg(long, help = "electronic|appliance|furniture")]
        category: Option<String>,
    },
    #[command(about = "Replace a product's descriptive fields; stock is left untouched")]
    Update {
        id: ProductId,
        #[command(flatten)]
        fields: ProductFields,
    },
    #[command(about = "Delete a product that has no movement history")]
    Delete { id: ProductId },
    #[command(about = "Derive profitability from the product's movement history")]
    Profit { id: ProductId },
}

#[derive(Debug, Args)]
pub struct ProductFields {
    #[arg(long)]
    pub code: String,
    #[arg(long)]
    pub description: String,
    #[arg(long, help = "electronic|appliance|furniture")]
    pub category: String,
    #[arg(
        long,
        allow_hyphen_values = true,
        help = "Per-unit cost, or batch total once stock is received"
    )]
    pub supplier_cost: Decimal,
}

impl ProductCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Create { .. } => "product create",
            Self::Get { .. } => "product get",
            Self::List { .. } => "product list",
            Self::Update { .. } => "product update",
            Self::Delete { .. } => "product delete",
            Self::Profit { .. } => "product profit",
        }
    }
}

pub fn run(conn: &Connection, command: ProductCommand) -> CommandResult {
    let name = command.name();
    let service = ProductService::new(
        SqliteProductRepository::new(conn),
        SqliteMovementRepository::new(conn),
    );

    let result = match command {
        ProductCommand::Create { fields, stock } => fields
            .into_draft(stock)
            .and_then(|draft| service.create_product(draft))
            .map(|product| CommandResult::success(name, "product created", product)),
        ProductCommand::Get { id } => service
            .get_product(id)
            .map(|product| CommandResult::success(name, "product loaded", product)),
        ProductCommand::List { category } => list(&service, category.as_deref())
            .map(|products| {
                let message = format!("{} product(s)", products.len());
                CommandResult::success(name, message, products)
            }),
        ProductCommand::Update { id, fields } => fields
            .into_draft(0)
            .and_then(|draft| service.update_product(id, draft))
            .map(|product| CommandResult::success(name, "product updated", product)),
        ProductCommand::Delete { id } => service
            .delete_product(id)
            .map(|()| CommandResult::success(name, "product deleted", id)),
        ProductCommand::Profit { id } => service
            .profit_report(id)
            .map(|report| CommandResult::success(name, "profit derived", report)),
    };

    result.unwrap_or_else(|error| CommandResult::from_service_error(name, &error))
}

type Service<'conn> =
    ProductService<SqliteProductRepository<'conn>, SqliteMovementRepository<'conn>>;

fn list(service: &Service<'_>, category: Option<&str>) -> Result<Vec<Product>, ServiceError> {
    match category {
        Some(raw) => service.list_products_by_category(raw.parse::<ProductCategory>()?),
        None => service.list_products(),
    }
}

impl ProductFields {
    fn into_draft(self, stock_quantity: u32) -> Result<ProductDraft, ServiceError> {
        Ok(ProductDraft {
            category: self.category.parse()?,
            code: self.code,
            description: self.description,
            supplier_cost: self.supplier_cost,
            stock_quantity,
        })
    }
}
