mod bookings;
mod common;
mod moderation;
mod reviews;
