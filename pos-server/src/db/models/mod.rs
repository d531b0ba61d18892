//! Database Models
//!
//! 每个集合一个模型文件，统一 `Model` / `ModelCreate` / `ModelUpdate` 三件套。

pub mod serde_helpers;

pub mod admin;
pub mod delivery;
pub mod menu_item;
pub mod order;
pub mod payment;
pub mod reservation;
pub mod session;
pub mod table;

pub use admin::{Admin, AdminProfile};
pub use delivery::{
    Address, Delivery, DeliveryCreate, DeliveryStatus, DeliveryUpdate, TransitionDenied,
    validate_transition,
};
pub use menu_item::{MenuItem, MenuItemCreate, MenuItemUpdate};
pub use order::{
    Charges, Customer, Order, OrderCreate, OrderLine, OrderStatus, OrderType, OrderUpdate,
    PaymentStatus,
};
pub use payment::{
    GatewayOrder, Payment, PaymentCreate, PaymentRequest, PaymentRequestCreate, PaymentSubject,
};
pub use reservation::{
    Reservation, ReservationCreate, ReservationPayment, ReservationStatus, ReservationUpdate,
};
pub use session::{Session, SessionCreate, SessionPayment, SessionUpdate, new_session_id};
pub use table::{
    ActivityClose, ActivityCreate, ActivityKind, ActivityStatus, AvailableTable, DiningTable,
    DiningTableCreate, DiningTableUpdate, TableActivity, TableStatus,
};
