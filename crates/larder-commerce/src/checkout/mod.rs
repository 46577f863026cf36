//! Order assembly and submission.

mod assembler;
mod fulfilment;
mod order;

pub use assembler::CheckoutAssembler;
pub use fulfilment::{Fulfilment, PaymentMethod};
pub use order::{OrderGateway, OrderLine, OrderPayload, OrderReceipt, PriceBasis};
