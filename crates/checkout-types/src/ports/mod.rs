pub mod cpf_validator;
pub mod order_repository;
pub mod payment_adapter;
