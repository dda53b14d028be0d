mod cart;
mod checkout_state;
mod contact;
mod payment;
mod product_status;
mod services;
mod slot;

pub use cart::{CartEntry, CartSnapshot, QuantityOverflow};
pub use checkout_state::{CheckoutState, HistoryBuffer};
pub use contact::{Address, CashOnDeliveryContact, CreditCard};
pub use payment::{DeliveryMethod, PaymentMethod};
pub use product_status::{ProductStatus, StatusState};
pub use services::{AdditionalService, ServiceFees, ServiceSelection};
pub use slot::{AppointmentCatalog, AppointmentSlot, SelectedSlot, SlotOffer};
