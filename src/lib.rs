pub mod configuration;

pub mod compute {
    pub mod computeerror;
    pub mod computereport;
    pub mod computerequest;
}

pub mod expression {
    pub mod expressionerror;
    pub mod lexer;
    pub mod expr;
    pub mod parser;
    pub mod expression;
}

pub mod integrand {
    pub mod integrand;
}

pub mod manager {
    pub mod managererror;
    pub mod manager;
}

pub mod math {
    pub mod round;
}

pub mod quadrature {
    pub mod midpointrule;
    pub mod convergence;
}

pub mod reference {
    pub mod exactintegral;
}
