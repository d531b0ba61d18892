//! 下单与桌台流程
//!
//! 把跨表的业务流程集中在一处，handler 只做参数解析和响应：
//!
//! - [`place_order`] - 订单创建 (堂食开台/续单、外带/外送取号)
//! - [`availability`] - 桌台可用性窗口计算
//! - [`reserve`] - 预订创建与冲突判定
//! - [`settlement`] - 买单请求的懒回收与一次性结账

pub mod availability;
pub mod place_order;
pub mod reserve;
pub mod settlement;

pub use availability::{AvailabilityQuery, available_tables};
pub use place_order::{PlacedOrder, place_order};
pub use reserve::create_reservation;
pub use settlement::{
    SettlementResult, confirm_request, create_request, end_session, refresh_requests,
};
