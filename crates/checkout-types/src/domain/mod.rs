pub mod cpf;
pub mod order;
pub mod payment;
