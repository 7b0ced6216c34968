mod oneof;
mod routing;
mod support;
