mod applications;
mod common;
mod interest;
mod routing;
