use crate::commands::CommandResult;
use clap::Subcommand;
use rusqlite::Connection;
use rust_decimal::Decimal;
use stockledger_core::{
    MovementId, MovementKind, MovementRequest, MovementService, ProductId, ServiceError,
    SqliteMovementRepository, SqliteProductRepository,
};

#[derive(Debug, Subcommand)]
pub enum MovementCommand {
    #[command(about = "Register an incoming or outgoing movement and apply it to stock")]
    Register {
        #[arg(long)]
        product: ProductId,
        #[arg(long, help = "incoming|outgoing")]
        kind: String,
        #[arg(long)]
        quantity: u32,
        #[arg(
            long,
            allow_hyphen_values = true,
            help = "Unit sale amount; required for outgoing movements"
        )]
        sale_amount: Option<Decimal>,
    },
    #[command(about = "Show one movement")]
    Get { id: MovementId },
    #[command(about = "List movements in registration order")]
    List {
        #[arg(long, help = "Only movements of this product")]
        product: Option<ProductId>,
    },
}

impl MovementCommand {
    pub fn name(&self) -> &'static str {
        match self {
            Self::Register { .. } => "movement register",
            Self::Get { .. } => "movement get",
            Self::List { .. } => "movement list",
        }
    }
}

pub fn run(conn: &Connection, command: MovementCommand) -> CommandResult {
    let name = command.name();
    let service = MovementService::new(
        SqliteProductRepository::new(conn),
        SqliteMovementRepository::new(conn),
    );

    let result = match command {
        MovementCommand::Register {
            product,
            kind,
            quantity,
            sale_amount,
        } => parse_kind(&kind)
            .map(|kind| MovementRequest {
                product_id: product,
                kind,
                quantity,
                sale_amount,
                requested_at: None,
            })
            .and_then(|request| service.register_movement(&request))
            .map(|movement| CommandResult::success(name, "movement registered", movement)),
        MovementCommand::Get { id } => service
            .get_movement(id)
            .map(|movement| CommandResult::success(name, "movement loaded", movement)),
        MovementCommand::List { product } => {
            let movements = match product {
                Some(product_id) => service.list_movements_by_product(product_id),
                None => service.list_movements(),
            };
            movements.map(|movements| {
                let message = format!("{} movement(s)", movements.len());
                CommandResult::success(name, message, movements)
            })
        }
    };

    result.unwrap_or_else(|error| CommandResult::from_service_error(name, &error))
}

fn parse_kind(raw: &str) -> Result<MovementKind, ServiceError> {
    Ok(raw.parse::<MovementKind>()?)
}
